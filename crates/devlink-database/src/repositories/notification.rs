//! Notification ledger repository implementation.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use devlink_core::error::{AppError, ErrorKind};
use devlink_core::result::AppResult;
use devlink_core::types::{CommunityId, UserId};
use devlink_entity::notification::{NewNotification, NotificationEntry, NotificationKind};

/// Repository for notification ledger entries.
///
/// This is the system of record for notifications: a failed write here is
/// surfaced to the caller rather than swallowed, because live delivery is
/// only an optimization layered on top of the stored entry.
#[derive(Debug, Clone)]
pub struct NotificationRepository {
    pool: PgPool,
}

impl NotificationRepository {
    /// Create a new notification repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Record a single ledger entry.
    pub async fn create(&self, input: &NewNotification) -> AppResult<NotificationEntry> {
        sqlx::query_as::<_, NotificationEntry>(
            "INSERT INTO notifications (from_user, to_user, kind, channel_ref, message) \
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(input.from_user)
        .bind(input.to_user)
        .bind(input.kind)
        .bind(input.channel_ref)
        .bind(&input.message)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::StorageUnavailable,
                "Failed to record notification",
                e,
            )
        })
    }

    /// Record one ledger entry per input.
    ///
    /// Each insert is atomic on its own; there is no cross-entry transaction,
    /// so a failure part-way leaves the already-inserted entries in place.
    pub async fn create_many(
        &self,
        inputs: &[NewNotification],
    ) -> AppResult<Vec<NotificationEntry>> {
        let mut entries = Vec::with_capacity(inputs.len());
        for input in inputs {
            entries.push(self.create(input).await?);
        }
        Ok(entries)
    }

    /// List all entries for a recipient, newest first.
    pub async fn find_by_recipient(&self, user_id: UserId) -> AppResult<Vec<NotificationEntry>> {
        sqlx::query_as::<_, NotificationEntry>(
            "SELECT * FROM notifications WHERE to_user = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::StorageUnavailable,
                "Failed to list notifications",
                e,
            )
        })
    }

    /// Count unread entries for a recipient.
    pub async fn count_unread(&self, user_id: UserId) -> AppResult<i64> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM notifications WHERE to_user = $1 AND read = FALSE",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::StorageUnavailable, "Failed to count unread", e)
        })
    }

    /// Mark every unread entry for a recipient as read.
    ///
    /// Returns the number of entries that transitioned; a repeated call
    /// affects zero rows.
    pub async fn mark_all_read(&self, user_id: UserId, now: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE notifications SET read = TRUE, read_at = $2 \
             WHERE to_user = $1 AND read = FALSE",
        )
        .bind(user_id)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::StorageUnavailable, "Failed to mark all read", e)
        })?;
        Ok(result.rows_affected())
    }

    /// Mark unread entries matching a kind and channel reference as read.
    ///
    /// Entries for other channels are untouched even when the recipient and
    /// kind match, so opening one community's chat does not clear badges for
    /// the others.
    pub async fn mark_channel_read(
        &self,
        user_id: UserId,
        kind: NotificationKind,
        channel_ref: CommunityId,
        now: DateTime<Utc>,
    ) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE notifications SET read = TRUE, read_at = $4 \
             WHERE to_user = $1 AND kind = $2 AND channel_ref = $3 AND read = FALSE",
        )
        .bind(user_id)
        .bind(kind)
        .bind(channel_ref)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::StorageUnavailable,
                "Failed to mark channel read",
                e,
            )
        })?;
        Ok(result.rows_affected())
    }

    /// Delete every entry for a recipient. Returns the deleted count.
    pub async fn delete_for_recipient(&self, user_id: UserId) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM notifications WHERE to_user = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::StorageUnavailable,
                    "Failed to delete notifications",
                    e,
                )
            })?;
        Ok(result.rows_affected())
    }

    /// Delete entries older than the cutoff. Returns the deleted count.
    pub async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM notifications WHERE created_at < $1")
            .bind(cutoff)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::StorageUnavailable,
                    "Failed to clean up notifications",
                    e,
                )
            })?;
        Ok(result.rows_affected())
    }
}
