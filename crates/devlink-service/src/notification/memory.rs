//! In-memory notification ledger.
//!
//! Backs tests and single-process development runs. Entries live in a
//! mutex-guarded vector; each operation is atomic per entry, matching the
//! guarantees of the PostgreSQL backend.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use devlink_core::result::AppResult;
use devlink_core::types::{CommunityId, NotificationId, UserId};
use devlink_entity::notification::{NewNotification, NotificationEntry, NotificationKind};

use super::ledger::NotificationLedger;

/// In-memory implementation of [`NotificationLedger`].
#[derive(Debug, Default)]
pub struct MemoryNotificationLedger {
    entries: Mutex<Vec<NotificationEntry>>,
}

impl MemoryNotificationLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(&self, input: &NewNotification) -> NotificationEntry {
        let entry = NotificationEntry {
            id: NotificationId::new(),
            from_user: input.from_user,
            to_user: input.to_user,
            kind: input.kind,
            channel_ref: input.channel_ref,
            message: input.message.clone(),
            read: false,
            read_at: None,
            created_at: Utc::now(),
        };
        self.lock().push(entry.clone());
        entry
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<NotificationEntry>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl NotificationLedger for MemoryNotificationLedger {
    async fn record(&self, input: &NewNotification) -> AppResult<NotificationEntry> {
        Ok(self.insert(input))
    }

    async fn record_many(&self, inputs: &[NewNotification]) -> AppResult<Vec<NotificationEntry>> {
        Ok(inputs.iter().map(|input| self.insert(input)).collect())
    }

    async fn list_for(&self, user_id: UserId) -> AppResult<Vec<NotificationEntry>> {
        let mut entries: Vec<NotificationEntry> = self
            .lock()
            .iter()
            .filter(|e| e.to_user == user_id)
            .cloned()
            .collect();
        // Reverse first so the stable sort keeps newest-first order for
        // entries recorded within the same timestamp tick.
        entries.reverse();
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(entries)
    }

    async fn count_unread(&self, user_id: UserId) -> AppResult<i64> {
        Ok(self
            .lock()
            .iter()
            .filter(|e| e.to_user == user_id && !e.read)
            .count() as i64)
    }

    async fn mark_all_read(&self, user_id: UserId, now: DateTime<Utc>) -> AppResult<u64> {
        let mut affected = 0u64;
        for entry in self.lock().iter_mut() {
            if entry.to_user == user_id && !entry.read {
                entry.read = true;
                entry.read_at = Some(now);
                affected += 1;
            }
        }
        Ok(affected)
    }

    async fn mark_channel_read(
        &self,
        user_id: UserId,
        kind: NotificationKind,
        channel_ref: CommunityId,
        now: DateTime<Utc>,
    ) -> AppResult<u64> {
        let mut affected = 0u64;
        for entry in self.lock().iter_mut() {
            if entry.to_user == user_id
                && entry.kind == kind
                && entry.channel_ref == Some(channel_ref)
                && !entry.read
            {
                entry.read = true;
                entry.read_at = Some(now);
                affected += 1;
            }
        }
        Ok(affected)
    }

    async fn delete_for(&self, user_id: UserId) -> AppResult<u64> {
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|e| e.to_user != user_id);
        Ok((before - entries.len()) as u64)
    }

    async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> AppResult<u64> {
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|e| e.created_at >= cutoff);
        Ok((before - entries.len()) as u64)
    }
}
