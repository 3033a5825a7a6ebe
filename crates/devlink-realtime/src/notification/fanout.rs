//! Notification fan-out — durable ledger write, then best-effort push.
//!
//! Ordering is a hard rule: the ledger write must complete before any live
//! push is attempted. The ledger is the system of record; the push is an
//! optimization layered on top of it.

use std::sync::Arc;

use tracing::debug;

use devlink_core::result::AppResult;
use devlink_core::types::UserId;
use devlink_entity::channel::Channel;
use devlink_entity::community::Community;
use devlink_entity::notification::{NewNotification, NotificationEntry, NotificationKind};
use devlink_service::notification::NotificationService;

use crate::dispatch::dispatcher::EventDispatcher;
use crate::dispatch::event::{DeliveryReport, DispatchTarget, EventPayload};
use crate::membership::RoomMembership;

/// Result of one fan-out: the durable entries plus the delivery outcome.
#[derive(Debug, Clone)]
pub struct FanoutReceipt {
    /// Ledger entries recorded for this event.
    pub entries: Vec<NotificationEntry>,
    /// Live delivery outcome.
    pub delivery: DeliveryReport,
}

/// Single entry point for every producing surface.
///
/// Follow, like, comment, and repost producers go through `notify_user`;
/// the messaging handlers use the two message-specific helpers. All paths
/// share the same ledger-first rule.
#[derive(Clone)]
pub struct NotificationFanout {
    /// Durable ledger.
    notifications: Arc<NotificationService>,
    /// Membership resolver for channel-wide recording.
    membership: Arc<RoomMembership>,
    /// Live dispatcher.
    dispatcher: Arc<EventDispatcher>,
}

impl std::fmt::Debug for NotificationFanout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationFanout").finish()
    }
}

impl NotificationFanout {
    /// Creates a new fan-out front end.
    pub fn new(
        notifications: Arc<NotificationService>,
        membership: Arc<RoomMembership>,
        dispatcher: Arc<EventDispatcher>,
    ) -> Self {
        Self {
            notifications,
            membership,
            dispatcher,
        }
    }

    /// Records one entry for a single recipient, then pushes to their live
    /// sessions.
    pub async fn notify_user(&self, input: NewNotification) -> AppResult<FanoutReceipt> {
        let entry = self.notifications.record(input).await?;
        let payload = EventPayload::for_entry(&entry);
        let delivery = self
            .dispatcher
            .dispatch(DispatchTarget::User(entry.to_user), &payload)
            .await?;
        Ok(FanoutReceipt {
            entries: vec![entry],
            delivery,
        })
    }

    /// Fan-out for a direct message: one ledger entry for the recipient,
    /// then a push over the direct channel (which excludes the sender).
    pub async fn notify_direct_message(
        &self,
        from: UserId,
        from_username: &str,
        to: UserId,
    ) -> AppResult<FanoutReceipt> {
        let body = format!("You have a new message from @{from_username}");
        let entry = self
            .notifications
            .record(NewNotification::new(
                from,
                to,
                NotificationKind::DirectMessage,
                body,
            ))
            .await?;

        let channel = Channel::direct(from, to);
        let payload = EventPayload::for_entry(&entry);
        let delivery = self
            .dispatcher
            .dispatch(DispatchTarget::Channel(channel), &payload)
            .await?;

        Ok(FanoutReceipt {
            entries: vec![entry],
            delivery,
        })
    }

    /// Fan-out for a community message: one independent ledger entry per
    /// member other than the sender, then a push to the community channel.
    pub async fn notify_community_message(
        &self,
        from: UserId,
        community: &Community,
    ) -> AppResult<FanoutReceipt> {
        let channel = Channel::community(community.id);
        let body = format!("New message in {}. Please check.", community.name);

        let recipients: Vec<UserId> = self
            .membership
            .members_of(&channel)
            .await?
            .into_iter()
            .filter(|member| *member != from)
            .collect();

        let inputs: Vec<NewNotification> = recipients
            .iter()
            .map(|member| {
                NewNotification::new(from, *member, NotificationKind::CommunityMessage, body.clone())
                    .with_channel(community.id)
            })
            .collect();

        let entries = self.notifications.record_many(inputs).await?;

        let created_at = entries
            .first()
            .map(|e| e.created_at)
            .unwrap_or_else(chrono::Utc::now);
        let payload = EventPayload::for_channel(
            NotificationKind::CommunityMessage,
            from,
            &channel,
            body,
            created_at,
        );
        let delivery = self
            .dispatcher
            .dispatch(DispatchTarget::Channel(channel), &payload)
            .await?;

        debug!(
            community_id = %community.id,
            recorded = entries.len(),
            attempted = delivery.attempted,
            delivered = delivery.delivered,
            "Community fan-out complete"
        );

        Ok(FanoutReceipt { entries, delivery })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::time::Duration;

    use devlink_core::error::AppError;
    use devlink_core::types::{CommunityId, ConnectionId};
    use devlink_service::context::RequestContext;
    use devlink_service::notification::MemoryNotificationLedger;

    use crate::connection::registry::SessionRegistry;
    use crate::membership::MembershipProvider;

    struct StaticMembership {
        communities: HashMap<CommunityId, Vec<UserId>>,
    }

    #[async_trait]
    impl MembershipProvider for StaticMembership {
        async fn members_of(&self, community_id: CommunityId) -> AppResult<Vec<UserId>> {
            self.communities
                .get(&community_id)
                .cloned()
                .ok_or_else(|| AppError::not_found("Community not found"))
        }
    }

    struct Harness {
        registry: Arc<SessionRegistry>,
        notifications: Arc<NotificationService>,
        fanout: NotificationFanout,
    }

    fn harness(communities: HashMap<CommunityId, Vec<UserId>>) -> Harness {
        let registry = Arc::new(SessionRegistry::new(8));
        let membership = Arc::new(RoomMembership::new(Arc::new(StaticMembership {
            communities,
        })));
        let notifications = Arc::new(NotificationService::new(Arc::new(
            MemoryNotificationLedger::new(),
        )));
        let dispatcher = Arc::new(EventDispatcher::new(
            registry.clone(),
            membership.clone(),
            Duration::from_millis(100),
        ));
        let fanout = NotificationFanout::new(notifications.clone(), membership, dispatcher);
        Harness {
            registry,
            notifications,
            fanout,
        }
    }

    fn community(id: CommunityId, owner: UserId) -> Community {
        Community {
            id,
            name: "Rustaceans".to_string(),
            description: String::new(),
            owner_id: owner,
            created_at: chrono::Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_community_message_records_one_entry_per_other_member() {
        let community_id = CommunityId::new();
        let u1 = UserId::new();
        let u2 = UserId::new();
        let u3 = UserId::new();
        let h = harness(HashMap::from([(community_id, vec![u1, u2, u3])]));

        let (_c2, mut rx2) = h.registry.register(u2, ConnectionId::new()).expect("u2");
        let (_c3, mut rx3) = h.registry.register(u3, ConnectionId::new()).expect("u3");

        let receipt = h
            .fanout
            .notify_community_message(u1, &community(community_id, u1))
            .await
            .expect("fanout");

        assert_eq!(receipt.entries.len(), 2);
        for entry in &receipt.entries {
            assert_eq!(entry.kind, NotificationKind::CommunityMessage);
            assert_eq!(entry.channel_ref, Some(community_id));
            assert!(!entry.read);
            assert_ne!(entry.to_user, u1);
        }
        let recipients: Vec<UserId> = receipt.entries.iter().map(|e| e.to_user).collect();
        assert!(recipients.contains(&u2));
        assert!(recipients.contains(&u3));

        assert_eq!(receipt.delivery.attempted, 2);
        assert_eq!(receipt.delivery.delivered, 2);
        assert!(rx2.try_recv().is_ok());
        assert!(rx3.try_recv().is_ok());
    }

    #[tokio::test]
    async fn test_offline_recipient_still_gets_a_ledger_entry() {
        let h = harness(HashMap::new());
        let from = UserId::new();
        let to = UserId::new();

        let receipt = h
            .fanout
            .notify_direct_message(from, "alice", to)
            .await
            .expect("fanout");

        assert_eq!(receipt.delivery.attempted, 0);
        assert_eq!(receipt.delivery.delivered, 0);
        assert_eq!(receipt.entries.len(), 1);
        assert!(!receipt.entries[0].read);

        let ctx = RequestContext::new(to, "bob");
        let listed = h.notifications.list(&ctx).await.expect("list");
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].kind, NotificationKind::DirectMessage);
    }

    #[tokio::test]
    async fn test_direct_message_reaches_every_recipient_session() {
        let h = harness(HashMap::new());
        let from = UserId::new();
        let to = UserId::new();

        let (_s1, mut rx1) = h.registry.register(to, ConnectionId::new()).expect("s1");
        let (_s2, mut rx2) = h.registry.register(to, ConnectionId::new()).expect("s2");

        let receipt = h
            .fanout
            .notify_direct_message(from, "alice", to)
            .await
            .expect("fanout");

        assert_eq!(receipt.delivery.attempted, 2);
        assert_eq!(receipt.delivery.delivered, 2);
        assert!(rx1.try_recv().is_ok());
        assert!(rx2.try_recv().is_ok());
    }

    #[tokio::test]
    async fn test_sender_sessions_never_receive_their_own_message() {
        let h = harness(HashMap::new());
        let from = UserId::new();
        let to = UserId::new();

        let (_fs, mut from_rx) = h.registry.register(from, ConnectionId::new()).expect("fs");

        h.fanout
            .notify_direct_message(from, "alice", to)
            .await
            .expect("fanout");

        assert!(from_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_follow_notification_flows_through_the_same_path() {
        let h = harness(HashMap::new());
        let from = UserId::new();
        let to = UserId::new();

        let receipt = h
            .fanout
            .notify_user(NewNotification::new(
                from,
                to,
                NotificationKind::Follow,
                "@alice started following you",
            ))
            .await
            .expect("fanout");

        assert_eq!(receipt.entries[0].kind, NotificationKind::Follow);
        let ctx = RequestContext::new(to, "bob");
        assert_eq!(h.notifications.unread_count(&ctx).await.expect("count"), 1);
    }
}
