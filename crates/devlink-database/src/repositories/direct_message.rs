//! Direct message repository implementation.

use sqlx::PgPool;

use devlink_core::error::{AppError, ErrorKind};
use devlink_core::result::AppResult;
use devlink_core::types::UserId;
use devlink_entity::chat::{DirectChatSummary, DirectMessage};

/// Repository for one-to-one messages.
#[derive(Debug, Clone)]
pub struct DirectMessageRepository {
    pool: PgPool,
}

impl DirectMessageRepository {
    /// Create a new direct message repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Persist a new message.
    pub async fn create(
        &self,
        sender_id: UserId,
        recipient_id: UserId,
        body: &str,
    ) -> AppResult<DirectMessage> {
        sqlx::query_as::<_, DirectMessage>(
            "INSERT INTO direct_messages (sender_id, recipient_id, body) \
             VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(sender_id)
        .bind(recipient_id)
        .bind(body)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::StorageUnavailable,
                "Failed to store direct message",
                e,
            )
        })
    }

    /// All messages between two users, oldest first.
    pub async fn find_conversation(
        &self,
        user_id: UserId,
        other_id: UserId,
    ) -> AppResult<Vec<DirectMessage>> {
        sqlx::query_as::<_, DirectMessage>(
            "SELECT * FROM direct_messages \
             WHERE (sender_id = $1 AND recipient_id = $2) \
                OR (sender_id = $2 AND recipient_id = $1) \
             ORDER BY created_at ASC",
        )
        .bind(user_id)
        .bind(other_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::StorageUnavailable,
                "Failed to list conversation",
                e,
            )
        })
    }

    /// One summary row per conversation partner, most recent first.
    pub async fn list_chats(&self, user_id: UserId) -> AppResult<Vec<DirectChatSummary>> {
        sqlx::query_as::<_, DirectChatSummary>(
            "SELECT partner_id, last_message, last_at FROM ( \
                SELECT DISTINCT ON (partner_id) \
                    CASE WHEN sender_id = $1 THEN recipient_id ELSE sender_id END AS partner_id, \
                    body AS last_message, \
                    created_at AS last_at \
                FROM direct_messages \
                WHERE sender_id = $1 OR recipient_id = $1 \
                ORDER BY partner_id, created_at DESC \
             ) chats ORDER BY last_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::StorageUnavailable, "Failed to list chats", e)
        })
    }
}
