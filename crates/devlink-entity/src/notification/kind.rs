//! Notification kind enumeration.

use serde::{Deserialize, Serialize};

/// The closed set of events that produce notifications.
///
/// Every producing surface publishes through this enumeration so that the
/// set of event kinds is exhaustively handled rather than stringly-typed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "notification_kind", rename_all = "snake_case")]
pub enum NotificationKind {
    /// A user started following the recipient.
    Follow,
    /// A user liked one of the recipient's posts.
    Like,
    /// A user sent the recipient a direct message.
    DirectMessage,
    /// A message was posted in a community the recipient belongs to.
    CommunityMessage,
    /// A user commented on one of the recipient's posts.
    Comment,
    /// A user reposted one of the recipient's posts.
    Repost,
}

impl NotificationKind {
    /// Return the kind as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Follow => "follow",
            Self::Like => "like",
            Self::DirectMessage => "direct_message",
            Self::CommunityMessage => "community_message",
            Self::Comment => "comment",
            Self::Repost => "repost",
        }
    }
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_uses_snake_case() {
        let json = serde_json::to_string(&NotificationKind::CommunityMessage).expect("serialize");
        assert_eq!(json, "\"community_message\"");
        let parsed: NotificationKind =
            serde_json::from_str("\"direct_message\"").expect("deserialize");
        assert_eq!(parsed, NotificationKind::DirectMessage);
    }
}
