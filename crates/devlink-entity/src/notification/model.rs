//! Notification ledger entry model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use devlink_core::types::{CommunityId, NotificationId, UserId};

use super::kind::NotificationKind;

/// A durable notification ledger entry.
///
/// One entry is recorded per recipient per producing event. The `read` flag
/// only ever transitions from `false` to `true`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct NotificationEntry {
    /// Unique entry identifier.
    pub id: NotificationId,
    /// The user who triggered the event.
    pub from_user: UserId,
    /// The recipient user.
    pub to_user: UserId,
    /// The kind of event that produced this entry.
    pub kind: NotificationKind,
    /// Community this entry belongs to, for channel-scoped read-marking.
    pub channel_ref: Option<CommunityId>,
    /// Human-readable notification body.
    pub message: String,
    /// Whether the recipient has read this entry.
    pub read: bool,
    /// When the entry was read.
    pub read_at: Option<DateTime<Utc>>,
    /// When the entry was recorded.
    pub created_at: DateTime<Utc>,
}

impl NotificationEntry {
    /// Check whether the entry is still unread.
    pub fn is_unread(&self) -> bool {
        !self.read
    }
}

/// Input for recording a new ledger entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewNotification {
    /// The user who triggered the event.
    pub from_user: UserId,
    /// The recipient user.
    pub to_user: UserId,
    /// The kind of event.
    pub kind: NotificationKind,
    /// Community reference for channel-scoped entries.
    pub channel_ref: Option<CommunityId>,
    /// Human-readable notification body.
    pub message: String,
}

impl NewNotification {
    /// Create a new notification input without a channel reference.
    pub fn new(
        from_user: UserId,
        to_user: UserId,
        kind: NotificationKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            from_user,
            to_user,
            kind,
            channel_ref: None,
            message: message.into(),
        }
    }

    /// Attach a community reference for scoped read-marking.
    pub fn with_channel(mut self, channel_ref: CommunityId) -> Self {
        self.channel_ref = Some(channel_ref);
        self
    }
}
