//! Notification ledger operations and unread-state reconciliation.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;

use devlink_core::result::AppResult;
use devlink_core::types::CommunityId;
use devlink_entity::notification::{NewNotification, NotificationEntry, NotificationKind};

use crate::context::RequestContext;

use super::ledger::NotificationLedger;

/// Manages the durable notification ledger.
///
/// Listing is a pure read: fetching the inbox never flips read flags. The
/// read transition only happens through the explicit mark operations, so a
/// client polling for badge counts cannot accidentally clear its inbox.
#[derive(Clone)]
pub struct NotificationService {
    /// Ledger storage backend.
    ledger: Arc<dyn NotificationLedger>,
}

impl std::fmt::Debug for NotificationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationService").finish()
    }
}

impl NotificationService {
    /// Creates a new notification service.
    pub fn new(ledger: Arc<dyn NotificationLedger>) -> Self {
        Self { ledger }
    }

    /// Durably records one entry. Callers must await this before treating
    /// the producing action as successful.
    pub async fn record(&self, input: NewNotification) -> AppResult<NotificationEntry> {
        self.ledger.record(&input).await
    }

    /// Durably records one entry per recipient.
    pub async fn record_many(
        &self,
        inputs: Vec<NewNotification>,
    ) -> AppResult<Vec<NotificationEntry>> {
        if inputs.is_empty() {
            return Ok(Vec::new());
        }
        self.ledger.record_many(&inputs).await
    }

    /// Lists the caller's notifications, newest first.
    pub async fn list(&self, ctx: &RequestContext) -> AppResult<Vec<NotificationEntry>> {
        self.ledger.list_for(ctx.user_id).await
    }

    /// Gets the caller's unread notification count.
    pub async fn unread_count(&self, ctx: &RequestContext) -> AppResult<i64> {
        self.ledger.count_unread(ctx.user_id).await
    }

    /// Marks all of the caller's notifications as read.
    ///
    /// Idempotent: a second call affects zero entries.
    pub async fn mark_all_read(&self, ctx: &RequestContext) -> AppResult<u64> {
        let affected = self.ledger.mark_all_read(ctx.user_id, Utc::now()).await?;
        debug!(user_id = %ctx.user_id, affected, "Marked all notifications read");
        Ok(affected)
    }

    /// Marks the caller's notifications for one channel as read.
    pub async fn mark_channel_read(
        &self,
        ctx: &RequestContext,
        kind: NotificationKind,
        channel_ref: CommunityId,
    ) -> AppResult<u64> {
        let affected = self
            .ledger
            .mark_channel_read(ctx.user_id, kind, channel_ref, Utc::now())
            .await?;
        debug!(
            user_id = %ctx.user_id,
            kind = %kind,
            channel_ref = %channel_ref,
            affected,
            "Marked channel notifications read"
        );
        Ok(affected)
    }

    /// Deletes all of the caller's notifications. Returns the deleted count.
    pub async fn delete_all(&self, ctx: &RequestContext) -> AppResult<u64> {
        self.ledger.delete_for(ctx.user_id).await
    }

    /// Deletes entries older than the cutoff. Returns the deleted count.
    pub async fn cleanup_older_than(&self, cutoff: DateTime<Utc>) -> AppResult<u64> {
        self.ledger.delete_older_than(cutoff).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use devlink_core::types::UserId;

    use crate::notification::memory::MemoryNotificationLedger;

    fn service() -> NotificationService {
        NotificationService::new(Arc::new(MemoryNotificationLedger::new()))
    }

    fn ctx() -> RequestContext {
        RequestContext::new(UserId::new(), "alice")
    }

    #[tokio::test]
    async fn test_record_is_immediately_visible_newest_first() {
        let svc = service();
        let ctx = ctx();
        let other = UserId::new();

        for i in 0..3 {
            svc.record(NewNotification::new(
                other,
                ctx.user_id,
                NotificationKind::Follow,
                format!("follow {i}"),
            ))
            .await
            .expect("record");
        }

        let listed = svc.list(&ctx).await.expect("list");
        assert_eq!(listed.len(), 3);
        assert_eq!(listed[0].message, "follow 2");
        assert!(listed.windows(2).all(|w| w[0].created_at >= w[1].created_at));
    }

    #[tokio::test]
    async fn test_mark_all_read_is_idempotent() {
        let svc = service();
        let ctx = ctx();
        let other = UserId::new();

        for _ in 0..4 {
            svc.record(NewNotification::new(
                other,
                ctx.user_id,
                NotificationKind::Like,
                "liked your post",
            ))
            .await
            .expect("record");
        }

        let first = svc.mark_all_read(&ctx).await.expect("first mark");
        assert_eq!(first, 4);

        let second = svc.mark_all_read(&ctx).await.expect("second mark");
        assert_eq!(second, 0);

        let listed = svc.list(&ctx).await.expect("list");
        assert!(listed.iter().all(|e| e.read));
    }

    #[tokio::test]
    async fn test_mark_channel_read_is_scoped() {
        let svc = service();
        let ctx = ctx();
        let other = UserId::new();
        let community_a = CommunityId::new();
        let community_b = CommunityId::new();

        svc.record(
            NewNotification::new(
                other,
                ctx.user_id,
                NotificationKind::CommunityMessage,
                "New message in Rustaceans. Please check.",
            )
            .with_channel(community_a),
        )
        .await
        .expect("record a");

        svc.record(
            NewNotification::new(
                other,
                ctx.user_id,
                NotificationKind::CommunityMessage,
                "New message in Gophers. Please check.",
            )
            .with_channel(community_b),
        )
        .await
        .expect("record b");

        let affected = svc
            .mark_channel_read(&ctx, NotificationKind::CommunityMessage, community_a)
            .await
            .expect("mark channel");
        assert_eq!(affected, 1);

        let listed = svc.list(&ctx).await.expect("list");
        let entry_a = listed
            .iter()
            .find(|e| e.channel_ref == Some(community_a))
            .expect("entry a");
        let entry_b = listed
            .iter()
            .find(|e| e.channel_ref == Some(community_b))
            .expect("entry b");
        assert!(entry_a.read);
        assert!(!entry_b.read);
    }

    #[tokio::test]
    async fn test_listing_does_not_flip_read_flags() {
        let svc = service();
        let ctx = ctx();

        svc.record(NewNotification::new(
            UserId::new(),
            ctx.user_id,
            NotificationKind::Comment,
            "commented on your post",
        ))
        .await
        .expect("record");

        let _ = svc.list(&ctx).await.expect("first list");
        let listed = svc.list(&ctx).await.expect("second list");
        assert!(listed.iter().all(|e| e.is_unread()));
        assert_eq!(svc.unread_count(&ctx).await.expect("count"), 1);
    }

    #[tokio::test]
    async fn test_delete_all_returns_count() {
        let svc = service();
        let ctx = ctx();

        for _ in 0..2 {
            svc.record(NewNotification::new(
                UserId::new(),
                ctx.user_id,
                NotificationKind::Repost,
                "reposted your post",
            ))
            .await
            .expect("record");
        }

        assert_eq!(svc.delete_all(&ctx).await.expect("delete"), 2);
        assert!(svc.list(&ctx).await.expect("list").is_empty());
    }
}
