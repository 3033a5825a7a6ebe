//! Logical delivery channels.

use serde::{Deserialize, Serialize};

use devlink_core::types::{CommunityId, UserId};

/// A logical delivery scope for real-time events.
///
/// Direct channels are canonicalized so that `(a, b)` and `(b, a)` name the
/// same channel; community channels are keyed by the community identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "scope", rename_all = "snake_case")]
pub enum Channel {
    /// A one-to-one conversation between two users.
    Direct {
        /// First participant (lower UUID).
        a: UserId,
        /// Second participant (higher UUID).
        b: UserId,
    },
    /// A community chat room.
    Community(CommunityId),
}

impl Channel {
    /// Create a direct channel for two participants, in canonical order.
    pub fn direct(x: UserId, y: UserId) -> Self {
        if x <= y {
            Self::Direct { a: x, b: y }
        } else {
            Self::Direct { a: y, b: x }
        }
    }

    /// Create a community channel.
    pub fn community(id: CommunityId) -> Self {
        Self::Community(id)
    }

    /// Stable wire name for this channel, e.g. `community:{id}`.
    pub fn name(&self) -> String {
        match self {
            Self::Direct { a, b } => format!("direct:{a}:{b}"),
            Self::Community(id) => format!("community:{id}"),
        }
    }

    /// The reference stored on ledger entries for scoped read-marking.
    ///
    /// Only community channels carry a reference; direct-message entries are
    /// scoped by the sender/recipient pair already present on the entry.
    pub fn channel_ref(&self) -> Option<CommunityId> {
        match self {
            Self::Direct { .. } => None,
            Self::Community(id) => Some(*id),
        }
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direct_channel_is_canonical() {
        let x = UserId::new();
        let y = UserId::new();
        assert_eq!(Channel::direct(x, y), Channel::direct(y, x));
    }

    #[test]
    fn test_direct_channel_name_is_order_independent() {
        let x = UserId::new();
        let y = UserId::new();
        assert_eq!(Channel::direct(x, y).name(), Channel::direct(y, x).name());
    }

    #[test]
    fn test_community_channel_ref() {
        let id = CommunityId::new();
        assert_eq!(Channel::community(id).channel_ref(), Some(id));
        assert_eq!(
            Channel::direct(UserId::new(), UserId::new()).channel_ref(),
            None
        );
    }
}
