//! Community management and community chat.

use std::sync::Arc;

use tracing::info;

use devlink_core::error::AppError;
use devlink_core::result::AppResult;
use devlink_core::types::{CommunityId, UserId};
use devlink_database::repositories::community::CommunityRepository;
use devlink_entity::community::{Community, CommunityMessage};

use crate::context::RequestContext;

/// Manages communities, their membership, and their chat rooms.
///
/// Membership reads always hit the repository; nothing here caches the
/// member set, so a fan-out started after a join or removal sees it.
#[derive(Debug, Clone)]
pub struct CommunityService {
    /// Community repository.
    communities: Arc<CommunityRepository>,
}

impl CommunityService {
    /// Creates a new community service.
    pub fn new(communities: Arc<CommunityRepository>) -> Self {
        Self { communities }
    }

    /// Creates a community owned by the caller.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        name: &str,
        description: &str,
    ) -> AppResult<Community> {
        if name.trim().is_empty() {
            return Err(AppError::validation("Community name is required"));
        }
        let community = self
            .communities
            .create(name.trim(), description, ctx.user_id)
            .await?;
        info!(community_id = %community.id, owner_id = %ctx.user_id, "Community created");
        Ok(community)
    }

    /// Fetches a community or fails with a not-found error.
    pub async fn get(&self, id: CommunityId) -> AppResult<Community> {
        self.communities
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Community not found"))
    }

    /// Lists all communities.
    pub async fn list(&self) -> AppResult<Vec<Community>> {
        self.communities.find_all().await
    }

    /// Searches communities by name, case-insensitive partial match.
    pub async fn search(&self, name: &str) -> AppResult<Vec<Community>> {
        if name.trim().is_empty() {
            return Err(AppError::validation("Community name is required"));
        }
        self.communities.search_by_name(name.trim()).await
    }

    /// Adds the caller to a community.
    pub async fn join(&self, ctx: &RequestContext, id: CommunityId) -> AppResult<()> {
        self.get(id).await?;
        let added = self.communities.add_member(id, ctx.user_id).await?;
        if !added {
            return Err(AppError::conflict("Already a member"));
        }
        info!(community_id = %id, user_id = %ctx.user_id, "User joined community");
        Ok(())
    }

    /// Removes the caller from a community.
    pub async fn leave(&self, ctx: &RequestContext, id: CommunityId) -> AppResult<()> {
        let community = self.get(id).await?;
        if community.is_owned_by(ctx.user_id) {
            return Err(AppError::validation("Owner cannot leave their community"));
        }
        let removed = self.communities.remove_member(id, ctx.user_id).await?;
        if !removed {
            return Err(AppError::validation("Not a member"));
        }
        Ok(())
    }

    /// Owner-only removal of another member.
    pub async fn remove_member(
        &self,
        ctx: &RequestContext,
        id: CommunityId,
        user_id: UserId,
    ) -> AppResult<()> {
        let community = self.get(id).await?;
        if !community.is_owned_by(ctx.user_id) {
            return Err(AppError::authorization("Only the owner can remove users"));
        }
        if user_id == ctx.user_id {
            return Err(AppError::validation("Owner cannot remove themselves"));
        }
        self.communities.remove_member(id, user_id).await?;
        info!(community_id = %id, user_id = %user_id, "User removed from community");
        Ok(())
    }

    /// All member ids of a community; fails if the community is unknown.
    pub async fn members_of(&self, id: CommunityId) -> AppResult<Vec<UserId>> {
        self.communities.members_of(id).await
    }

    /// Lists a community's messages, oldest first.
    pub async fn messages(&self, id: CommunityId) -> AppResult<Vec<CommunityMessage>> {
        self.get(id).await?;
        self.communities.find_messages(id).await
    }

    /// Persists a chat message from a member of the community.
    ///
    /// Returns the community along with the stored message so the caller can
    /// build notification text from the community name.
    pub async fn send_message(
        &self,
        ctx: &RequestContext,
        id: CommunityId,
        body: &str,
    ) -> AppResult<(Community, CommunityMessage)> {
        if body.trim().is_empty() {
            return Err(AppError::validation("Message text required"));
        }
        let community = self.get(id).await?;
        if !self.communities.is_member(id, ctx.user_id).await? {
            return Err(AppError::authorization("Join the community to chat"));
        }
        let message = self
            .communities
            .create_message(id, ctx.user_id, body)
            .await?;
        Ok((community, message))
    }
}
