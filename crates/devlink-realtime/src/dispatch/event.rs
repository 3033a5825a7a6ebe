//! Dispatched event types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use devlink_core::types::UserId;
use devlink_entity::channel::Channel;
use devlink_entity::notification::{NotificationEntry, NotificationKind};

/// Where a dispatch is aimed: a single user or a whole channel.
///
/// Ephemeral — exists only for the duration of a dispatch call.
#[derive(Debug, Clone)]
pub enum DispatchTarget {
    /// All live sessions of one user.
    User(UserId),
    /// All live sessions of a channel's members, excluding the sender.
    Channel(Channel),
}

/// The `to` field of the wire payload: a recipient or a channel name.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EventAddress {
    /// A single recipient.
    User(UserId),
    /// A channel, by its stable wire name.
    Channel(String),
}

/// The JSON frame pushed to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPayload {
    /// The kind of event.
    pub kind: NotificationKind,
    /// The user who triggered the event.
    pub from: UserId,
    /// The recipient or channel the event addresses.
    pub to: EventAddress,
    /// Human-readable body.
    pub message: String,
    /// When the event was recorded.
    pub created_at: DateTime<Utc>,
}

impl EventPayload {
    /// Builds the payload for a recorded ledger entry addressed to its
    /// recipient.
    pub fn for_entry(entry: &NotificationEntry) -> Self {
        Self {
            kind: entry.kind,
            from: entry.from_user,
            to: EventAddress::User(entry.to_user),
            message: entry.message.clone(),
            created_at: entry.created_at,
        }
    }

    /// Builds a channel-addressed payload.
    pub fn for_channel(
        kind: NotificationKind,
        from: UserId,
        channel: &Channel,
        message: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            kind,
            from,
            to: EventAddress::Channel(channel.name()),
            message: message.into(),
            created_at,
        }
    }
}

/// Outcome of one dispatch invocation.
///
/// `delivered < attempted` means some pushes timed out or hit dead
/// connections; that is not an error — clients reconcile via the ledger.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryReport {
    /// Number of live connections a push was attempted on.
    pub attempted: usize,
    /// Number of pushes that completed.
    pub delivered: usize,
}
