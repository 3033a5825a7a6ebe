//! Direct message models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use devlink_core::types::{MessageId, UserId};

/// A one-to-one message between two users.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DirectMessage {
    /// Unique message identifier.
    pub id: MessageId,
    /// The sending user.
    pub sender_id: UserId,
    /// The receiving user.
    pub recipient_id: UserId,
    /// Message text.
    pub body: String,
    /// When the message was sent.
    pub created_at: DateTime<Utc>,
}

/// Summary row for the chat list: one entry per conversation partner.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DirectChatSummary {
    /// The other participant in the conversation.
    pub partner_id: UserId,
    /// Text of the most recent message.
    pub last_message: String,
    /// When the most recent message was sent.
    pub last_at: DateTime<Utc>,
}
