//! Storage seam for the notification ledger.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use devlink_core::result::AppResult;
use devlink_core::types::{CommunityId, UserId};
use devlink_database::repositories::notification::NotificationRepository;
use devlink_entity::notification::{NewNotification, NotificationEntry, NotificationKind};

/// Durable storage backend for notification entries.
///
/// The PostgreSQL repository is the production implementation; an in-memory
/// implementation backs tests and single-process development.
#[async_trait]
pub trait NotificationLedger: Send + Sync + 'static {
    /// Durably record one entry.
    async fn record(&self, input: &NewNotification) -> AppResult<NotificationEntry>;

    /// Durably record one entry per input; atomic per entry only.
    async fn record_many(&self, inputs: &[NewNotification]) -> AppResult<Vec<NotificationEntry>>;

    /// All entries for a recipient, newest first.
    async fn list_for(&self, user_id: UserId) -> AppResult<Vec<NotificationEntry>>;

    /// Unread entry count for a recipient.
    async fn count_unread(&self, user_id: UserId) -> AppResult<i64>;

    /// Flip every unread entry for a recipient to read; returns affected count.
    async fn mark_all_read(&self, user_id: UserId, now: DateTime<Utc>) -> AppResult<u64>;

    /// Flip unread entries matching kind and channel to read; returns affected count.
    async fn mark_channel_read(
        &self,
        user_id: UserId,
        kind: NotificationKind,
        channel_ref: CommunityId,
        now: DateTime<Utc>,
    ) -> AppResult<u64>;

    /// Delete every entry for a recipient; returns deleted count.
    async fn delete_for(&self, user_id: UserId) -> AppResult<u64>;

    /// Delete entries older than the cutoff; returns deleted count.
    async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> AppResult<u64>;
}

#[async_trait]
impl NotificationLedger for NotificationRepository {
    async fn record(&self, input: &NewNotification) -> AppResult<NotificationEntry> {
        self.create(input).await
    }

    async fn record_many(&self, inputs: &[NewNotification]) -> AppResult<Vec<NotificationEntry>> {
        self.create_many(inputs).await
    }

    async fn list_for(&self, user_id: UserId) -> AppResult<Vec<NotificationEntry>> {
        self.find_by_recipient(user_id).await
    }

    async fn count_unread(&self, user_id: UserId) -> AppResult<i64> {
        NotificationRepository::count_unread(self, user_id).await
    }

    async fn mark_all_read(&self, user_id: UserId, now: DateTime<Utc>) -> AppResult<u64> {
        NotificationRepository::mark_all_read(self, user_id, now).await
    }

    async fn mark_channel_read(
        &self,
        user_id: UserId,
        kind: NotificationKind,
        channel_ref: CommunityId,
        now: DateTime<Utc>,
    ) -> AppResult<u64> {
        NotificationRepository::mark_channel_read(self, user_id, kind, channel_ref, now).await
    }

    async fn delete_for(&self, user_id: UserId) -> AppResult<u64> {
        self.delete_for_recipient(user_id).await
    }

    async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> AppResult<u64> {
        NotificationRepository::delete_older_than(self, cutoff).await
    }
}
