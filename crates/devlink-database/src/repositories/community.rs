//! Community repository implementation.
//!
//! Owns community records, the membership table, and community messages.
//! Membership is read back on every fan-out, so no caching happens here.

use sqlx::PgPool;

use devlink_core::error::{AppError, ErrorKind};
use devlink_core::result::AppResult;
use devlink_core::types::{CommunityId, UserId};
use devlink_entity::community::{Community, CommunityMessage};

/// Repository for communities, membership, and community messages.
#[derive(Debug, Clone)]
pub struct CommunityRepository {
    pool: PgPool,
}

impl CommunityRepository {
    /// Create a new community repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a community with the owner as its first member.
    pub async fn create(
        &self,
        name: &str,
        description: &str,
        owner_id: UserId,
    ) -> AppResult<Community> {
        let mut tx = self.pool.begin().await.map_err(storage_err)?;

        let community = sqlx::query_as::<_, Community>(
            "INSERT INTO communities (name, description, owner_id) \
             VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(name)
        .bind(description)
        .bind(owner_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(storage_err)?;

        sqlx::query("INSERT INTO community_members (community_id, user_id) VALUES ($1, $2)")
            .bind(community.id)
            .bind(owner_id)
            .execute(&mut *tx)
            .await
            .map_err(storage_err)?;

        tx.commit().await.map_err(storage_err)?;
        Ok(community)
    }

    /// Find a community by id.
    pub async fn find_by_id(&self, id: CommunityId) -> AppResult<Option<Community>> {
        sqlx::query_as::<_, Community>("SELECT * FROM communities WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_err)
    }

    /// List all communities, newest first.
    pub async fn find_all(&self) -> AppResult<Vec<Community>> {
        sqlx::query_as::<_, Community>("SELECT * FROM communities ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await
            .map_err(storage_err)
    }

    /// Case-insensitive partial match on community name.
    pub async fn search_by_name(&self, name: &str) -> AppResult<Vec<Community>> {
        sqlx::query_as::<_, Community>(
            "SELECT * FROM communities WHERE name ILIKE '%' || $1 || '%' ORDER BY name",
        )
        .bind(name)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_err)
    }

    /// Add a member. Returns `false` if the user was already a member.
    pub async fn add_member(&self, community_id: CommunityId, user_id: UserId) -> AppResult<bool> {
        let result = sqlx::query(
            "INSERT INTO community_members (community_id, user_id) VALUES ($1, $2) \
             ON CONFLICT DO NOTHING",
        )
        .bind(community_id)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(storage_err)?;
        Ok(result.rows_affected() > 0)
    }

    /// Remove a member. Returns `false` if the user was not a member.
    pub async fn remove_member(
        &self,
        community_id: CommunityId,
        user_id: UserId,
    ) -> AppResult<bool> {
        let result =
            sqlx::query("DELETE FROM community_members WHERE community_id = $1 AND user_id = $2")
                .bind(community_id)
                .bind(user_id)
                .execute(&self.pool)
                .await
                .map_err(storage_err)?;
        Ok(result.rows_affected() > 0)
    }

    /// Check whether a user belongs to a community.
    pub async fn is_member(&self, community_id: CommunityId, user_id: UserId) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (\
                SELECT 1 FROM community_members WHERE community_id = $1 AND user_id = $2\
             )",
        )
        .bind(community_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(storage_err)
    }

    /// All member ids of a community.
    ///
    /// Fails with a not-found error when the community itself does not exist,
    /// so callers can distinguish an unknown channel from an empty one.
    pub async fn members_of(&self, community_id: CommunityId) -> AppResult<Vec<UserId>> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM communities WHERE id = $1)")
                .bind(community_id)
                .fetch_one(&self.pool)
                .await
                .map_err(storage_err)?;

        if !exists {
            return Err(AppError::not_found(format!(
                "Community {community_id} not found"
            )));
        }

        sqlx::query_scalar::<_, UserId>(
            "SELECT user_id FROM community_members WHERE community_id = $1",
        )
        .bind(community_id)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_err)
    }

    /// Persist a community message.
    pub async fn create_message(
        &self,
        community_id: CommunityId,
        sender_id: UserId,
        body: &str,
    ) -> AppResult<CommunityMessage> {
        sqlx::query_as::<_, CommunityMessage>(
            "INSERT INTO community_messages (community_id, sender_id, body) \
             VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(community_id)
        .bind(sender_id)
        .bind(body)
        .fetch_one(&self.pool)
        .await
        .map_err(storage_err)
    }

    /// All messages in a community, oldest first.
    pub async fn find_messages(&self, community_id: CommunityId) -> AppResult<Vec<CommunityMessage>> {
        sqlx::query_as::<_, CommunityMessage>(
            "SELECT * FROM community_messages WHERE community_id = $1 ORDER BY created_at ASC",
        )
        .bind(community_id)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_err)
    }
}

fn storage_err(e: sqlx::Error) -> AppError {
    AppError::with_source(ErrorKind::StorageUnavailable, "Community store error", e)
}
