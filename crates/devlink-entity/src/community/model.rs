//! Community and community message models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use devlink_core::types::{CommunityId, MessageId, UserId};

/// A community chat room.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Community {
    /// Unique community identifier.
    pub id: CommunityId,
    /// Display name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// The user who created and administers the community.
    pub owner_id: UserId,
    /// When the community was created.
    pub created_at: DateTime<Utc>,
}

impl Community {
    /// Check whether the given user owns this community.
    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.owner_id == user_id
    }
}

/// A message posted in a community chat room.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CommunityMessage {
    /// Unique message identifier.
    pub id: MessageId,
    /// The community this message was posted in.
    pub community_id: CommunityId,
    /// The posting user.
    pub sender_id: UserId,
    /// Message text.
    pub body: String,
    /// When the message was posted.
    pub created_at: DateTime<Utc>,
}
