//! Channel membership resolution.

use std::sync::Arc;

use async_trait::async_trait;

use devlink_core::result::AppResult;
use devlink_core::types::{CommunityId, UserId};
use devlink_entity::channel::Channel;
use devlink_service::community::CommunityService;

/// Source of community membership.
///
/// Membership is owned by the community system; the fan-out path only reads
/// it, and reads it on every dispatch so joins and removals take effect
/// immediately.
#[async_trait]
pub trait MembershipProvider: Send + Sync + 'static {
    /// All member ids of a community; fails when the community is unknown.
    async fn members_of(&self, community_id: CommunityId) -> AppResult<Vec<UserId>>;
}

#[async_trait]
impl MembershipProvider for CommunityService {
    async fn members_of(&self, community_id: CommunityId) -> AppResult<Vec<UserId>> {
        CommunityService::members_of(self, community_id).await
    }
}

/// Resolves a channel to its member identities.
#[derive(Clone)]
pub struct RoomMembership {
    /// Community membership source.
    provider: Arc<dyn MembershipProvider>,
}

impl std::fmt::Debug for RoomMembership {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoomMembership").finish()
    }
}

impl RoomMembership {
    /// Creates a new membership resolver.
    pub fn new(provider: Arc<dyn MembershipProvider>) -> Self {
        Self { provider }
    }

    /// Resolves the member set of a channel.
    ///
    /// Direct pairs resolve locally to their two participants; community
    /// channels delegate to the provider on every call (no caching).
    pub async fn members_of(&self, channel: &Channel) -> AppResult<Vec<UserId>> {
        match channel {
            Channel::Direct { a, b } => {
                if a == b {
                    Ok(vec![*a])
                } else {
                    Ok(vec![*a, *b])
                }
            }
            Channel::Community(id) => self.provider.members_of(*id).await,
        }
    }
}
