//! Request DTOs.

use serde::Deserialize;
use validator::Validate;

use devlink_core::types::CommunityId;
use devlink_entity::notification::NotificationKind;

/// Body for sending a direct or community message.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SendMessageRequest {
    /// Message text.
    #[validate(length(min = 1, max = 4000, message = "Message text required"))]
    pub body: String,
}

/// Body for creating a community.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCommunityRequest {
    /// Community display name.
    #[validate(length(min = 1, max = 80, message = "Community name is required"))]
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    #[validate(length(max = 500))]
    pub description: String,
}

/// Body for marking one channel's notifications as read.
#[derive(Debug, Clone, Deserialize)]
pub struct MarkChannelReadRequest {
    /// Notification kind to match.
    pub kind: NotificationKind,
    /// Community the channel belongs to.
    pub channel_ref: CommunityId,
}

/// Query parameters for community search.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchQuery {
    /// Name fragment to match.
    pub name: String,
}
