//! Notification inbox handlers.
//!
//! Listing is a pure read; clients clear badges through the explicit mark
//! endpoints.

use axum::Json;
use axum::extract::State;

use devlink_entity::notification::NotificationEntry;

use crate::dto::request::MarkChannelReadRequest;
use crate::dto::response::{ApiResponse, CountResponse, DeletedResponse, MarkedResponse};
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/notifications
pub async fn list_notifications(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<Vec<NotificationEntry>>>, ApiError> {
    let entries = state.notification_service.list(&auth).await?;
    Ok(Json(ApiResponse::ok(entries)))
}

/// GET /api/notifications/unread-count
pub async fn unread_count(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<CountResponse>>, ApiError> {
    let count = state.notification_service.unread_count(&auth).await?;
    Ok(Json(ApiResponse::ok(CountResponse { count })))
}

/// PUT /api/notifications/read-all
pub async fn mark_all_read(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<MarkedResponse>>, ApiError> {
    let marked = state.notification_service.mark_all_read(&auth).await?;
    Ok(Json(ApiResponse::ok(MarkedResponse { marked })))
}

/// PUT /api/notifications/channel/read
pub async fn mark_channel_read(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<MarkChannelReadRequest>,
) -> Result<Json<ApiResponse<MarkedResponse>>, ApiError> {
    let marked = state
        .notification_service
        .mark_channel_read(&auth, req.kind, req.channel_ref)
        .await?;
    Ok(Json(ApiResponse::ok(MarkedResponse { marked })))
}

/// DELETE /api/notifications
pub async fn delete_notifications(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<DeletedResponse>>, ApiError> {
    let deleted = state.notification_service.delete_all(&auth).await?;
    Ok(Json(ApiResponse::ok(DeletedResponse { deleted })))
}
