//! Shared value types.

pub mod id;

pub use id::{CommunityId, ConnectionId, MessageId, NotificationId, UserId};
