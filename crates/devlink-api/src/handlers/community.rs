//! Community handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use validator::Validate;

use devlink_core::error::AppError;
use devlink_core::types::{CommunityId, UserId};
use devlink_entity::community::{Community, CommunityMessage};

use crate::dto::request::{CreateCommunityRequest, SearchQuery, SendMessageRequest};
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/communities
pub async fn list_communities(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Community>>>, ApiError> {
    let communities = state.community_service.list().await?;
    Ok(Json(ApiResponse::ok(communities)))
}

/// GET /api/communities/search?name=
pub async fn search_communities(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<ApiResponse<Vec<Community>>>, ApiError> {
    let communities = state.community_service.search(&query.name).await?;
    Ok(Json(ApiResponse::ok(communities)))
}

/// POST /api/communities
pub async fn create_community(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateCommunityRequest>,
) -> Result<Json<ApiResponse<Community>>, ApiError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;
    let community = state
        .community_service
        .create(&auth, &req.name, &req.description)
        .await?;
    Ok(Json(ApiResponse::ok(community)))
}

/// GET /api/communities/{id}
pub async fn get_community(
    State(state): State<AppState>,
    Path(id): Path<CommunityId>,
) -> Result<Json<ApiResponse<Community>>, ApiError> {
    let community = state.community_service.get(id).await?;
    Ok(Json(ApiResponse::ok(community)))
}

/// POST /api/communities/{id}/join
pub async fn join_community(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<CommunityId>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.community_service.join(&auth, id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse {
        message: "Joined community".to_string(),
    })))
}

/// POST /api/communities/{id}/leave
pub async fn leave_community(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<CommunityId>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.community_service.leave(&auth, id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse {
        message: "Left community".to_string(),
    })))
}

/// DELETE /api/communities/{id}/members/{user_id}
pub async fn remove_member(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((id, user_id)): Path<(CommunityId, UserId)>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.community_service.remove_member(&auth, id, user_id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse {
        message: "User removed".to_string(),
    })))
}

/// GET /api/communities/{id}/messages
pub async fn list_messages(
    State(state): State<AppState>,
    Path(id): Path<CommunityId>,
) -> Result<Json<ApiResponse<Vec<CommunityMessage>>>, ApiError> {
    let messages = state.community_service.messages(id).await?;
    Ok(Json(ApiResponse::ok(messages)))
}

/// POST /api/communities/{id}/messages
///
/// Members only. The message is persisted, then one notification per other
/// member is durably recorded before the live push to the community channel.
pub async fn send_message(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<CommunityId>,
    Json(req): Json<SendMessageRequest>,
) -> Result<Json<ApiResponse<CommunityMessage>>, ApiError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let (community, message) = state
        .community_service
        .send_message(&auth, id, &req.body)
        .await?;

    state
        .realtime
        .fanout
        .notify_community_message(auth.user_id, &community)
        .await?;

    Ok(Json(ApiResponse::ok(message)))
}
