//! Direct messaging handlers.

use axum::Json;
use axum::extract::{Path, State};
use validator::Validate;

use devlink_core::error::AppError;
use devlink_core::types::UserId;
use devlink_entity::chat::{DirectChatSummary, DirectMessage};

use crate::dto::request::SendMessageRequest;
use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/chats
pub async fn list_chats(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<Vec<DirectChatSummary>>>, ApiError> {
    let chats = state.direct_message_service.list_chats(&auth).await?;
    Ok(Json(ApiResponse::ok(chats)))
}

/// GET /api/chats/{user_id}/messages
pub async fn get_conversation(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<UserId>,
) -> Result<Json<ApiResponse<Vec<DirectMessage>>>, ApiError> {
    let messages = state
        .direct_message_service
        .conversation_with(&auth, user_id)
        .await?;
    Ok(Json(ApiResponse::ok(messages)))
}

/// POST /api/chats/{user_id}/messages
///
/// Persists the message, durably records the recipient's notification, and
/// only then attempts the live push. A failed ledger write fails the whole
/// request; a missed push does not.
pub async fn send_message(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<UserId>,
    Json(req): Json<SendMessageRequest>,
) -> Result<Json<ApiResponse<DirectMessage>>, ApiError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let message = state
        .direct_message_service
        .send(&auth, user_id, &req.body)
        .await?;

    state
        .realtime
        .fanout
        .notify_direct_message(auth.user_id, &auth.username, user_id)
        .await?;

    Ok(Json(ApiResponse::ok(message)))
}
