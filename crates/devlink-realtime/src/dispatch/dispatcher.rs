//! Event dispatcher — best-effort concurrent fan-out to live sessions.

use std::sync::Arc;
use std::time::Duration;

use futures::future;
use tracing::debug;

use devlink_core::result::AppResult;
use devlink_core::types::UserId;

use crate::connection::registry::SessionRegistry;
use crate::membership::RoomMembership;

use super::event::{DeliveryReport, DispatchTarget, EventPayload};

/// Pushes events to the live sessions of a target user or channel.
///
/// Delivery is strictly best-effort: undeliverable pushes (no session, dead
/// connection, per-push timeout) are folded into the report, never raised.
/// The one hard failure is an unknown channel, which aborts the dispatch
/// before any push is attempted.
#[derive(Debug)]
pub struct EventDispatcher {
    /// Session registry for live-connection lookup.
    registry: Arc<SessionRegistry>,
    /// Channel membership resolver, re-queried on every dispatch.
    membership: Arc<RoomMembership>,
    /// Per-connection push timeout.
    push_timeout: Duration,
}

impl EventDispatcher {
    /// Creates a new dispatcher.
    pub fn new(
        registry: Arc<SessionRegistry>,
        membership: Arc<RoomMembership>,
        push_timeout: Duration,
    ) -> Self {
        Self {
            registry,
            membership,
            push_timeout,
        }
    }

    /// Dispatches one event to all live sessions of the target.
    ///
    /// For channel targets the member set is resolved fresh and the payload's
    /// originating user is excluded, so senders never receive an echo of
    /// their own message. Per-connection pushes run concurrently; one
    /// unresponsive connection cannot stall delivery to the rest.
    pub async fn dispatch(
        &self,
        target: DispatchTarget,
        payload: &EventPayload,
    ) -> AppResult<DeliveryReport> {
        let recipients: Vec<UserId> = match &target {
            DispatchTarget::User(user_id) => vec![*user_id],
            DispatchTarget::Channel(channel) => self
                .membership
                .members_of(channel)
                .await?
                .into_iter()
                .filter(|member| *member != payload.from)
                .collect(),
        };

        let frame = serde_json::to_string(payload)?;

        let mut pushes = Vec::new();
        for user_id in &recipients {
            for conn in self.registry.sessions_for(user_id) {
                let frame = frame.clone();
                let timeout = self.push_timeout;
                pushes.push(async move { conn.push(frame, timeout).await });
            }
        }

        let attempted = pushes.len();
        let delivered = future::join_all(pushes)
            .await
            .into_iter()
            .filter(|ok| *ok)
            .count();

        debug!(
            kind = %payload.kind,
            recipients = recipients.len(),
            attempted,
            delivered,
            "Dispatch complete"
        );

        Ok(DeliveryReport {
            attempted,
            delivered,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::collections::HashMap;

    use devlink_core::error::{AppError, ErrorKind};
    use devlink_core::types::{CommunityId, ConnectionId};
    use devlink_entity::channel::Channel;
    use devlink_entity::notification::NotificationKind;

    use crate::dispatch::event::EventAddress;
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

    fn dispatcher_with(
        communities: HashMap<CommunityId, Vec<UserId>>,
    ) -> (Arc<SessionRegistry>, EventDispatcher) {
        let registry = Arc::new(SessionRegistry::new(8));
        let membership = Arc::new(RoomMembership::new(Arc::new(StaticMembership {
            communities,
        })));
        let dispatcher = EventDispatcher::new(
            registry.clone(),
            membership,
            Duration::from_millis(100),
        );
        (registry, dispatcher)
    }

    fn payload_to(from: UserId, to: UserId) -> EventPayload {
        EventPayload {
            kind: NotificationKind::DirectMessage,
            from,
            to: EventAddress::User(to),
            message: "You have a new message from @alice".to_string(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_dispatch_to_offline_user_never_raises() {
        let (_registry, dispatcher) = dispatcher_with(HashMap::new());
        let from = UserId::new();
        let to = UserId::new();

        let report = dispatcher
            .dispatch(DispatchTarget::User(to), &payload_to(from, to))
            .await
            .expect("dispatch");
        assert_eq!(
            report,
            DeliveryReport {
                attempted: 0,
                delivered: 0
            }
        );
    }

    #[tokio::test]
    async fn test_dispatch_reaches_all_sessions_of_a_user() {
        let (registry, dispatcher) = dispatcher_with(HashMap::new());
        let from = UserId::new();
        let to = UserId::new();

        let (_h1, mut rx1) = registry.register(to, ConnectionId::new()).expect("s1");
        let (_h2, mut rx2) = registry.register(to, ConnectionId::new()).expect("s2");

        let report = dispatcher
            .dispatch(
                DispatchTarget::Channel(Channel::direct(from, to)),
                &payload_to(from, to),
            )
            .await
            .expect("dispatch");

        assert_eq!(report.attempted, 2);
        assert_eq!(report.delivered, 2);
        assert!(rx1.try_recv().is_ok());
        assert!(rx2.try_recv().is_ok());
    }

    #[tokio::test]
    async fn test_channel_dispatch_excludes_sender() {
        let community = CommunityId::new();
        let sender = UserId::new();
        let member = UserId::new();
        let (registry, dispatcher) = dispatcher_with(HashMap::from([(
            community,
            vec![sender, member],
        )]));

        let (_hs, mut sender_rx) = registry.register(sender, ConnectionId::new()).expect("s");
        let (_hm, mut member_rx) = registry.register(member, ConnectionId::new()).expect("m");

        let channel = Channel::community(community);
        let payload = EventPayload::for_channel(
            NotificationKind::CommunityMessage,
            sender,
            &channel,
            "New message in Rustaceans. Please check.",
            Utc::now(),
        );

        let report = dispatcher
            .dispatch(DispatchTarget::Channel(channel), &payload)
            .await
            .expect("dispatch");

        assert_eq!(report.attempted, 1);
        assert_eq!(report.delivered, 1);
        assert!(member_rx.try_recv().is_ok());
        assert!(sender_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_unknown_channel_fails_before_any_push() {
        let (registry, dispatcher) = dispatcher_with(HashMap::new());
        let user = UserId::new();
        let (_h, mut rx) = registry.register(user, ConnectionId::new()).expect("conn");

        let channel = Channel::community(CommunityId::new());
        let payload = EventPayload::for_channel(
            NotificationKind::CommunityMessage,
            UserId::new(),
            &channel,
            "New message in Rustaceans. Please check.",
            Utc::now(),
        );

        let err = dispatcher
            .dispatch(DispatchTarget::Channel(channel), &payload)
            .await
            .expect_err("unknown channel");
        assert!(err.is_kind(ErrorKind::NotFound));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stuck_connection_does_not_block_the_rest() {
        // Buffer size 1: a single undrained frame wedges a connection.
        let registry = Arc::new(SessionRegistry::new(1));
        let membership = Arc::new(RoomMembership::new(Arc::new(StaticMembership {
            communities: HashMap::new(),
        })));
        let dispatcher = EventDispatcher::new(
            registry.clone(),
            membership,
            Duration::from_millis(100),
        );

        let from = UserId::new();
        let to = UserId::new();

        let (stuck_handle, _stuck_rx) =
            registry.register(to, ConnectionId::new()).expect("stuck");
        assert!(
            stuck_handle
                .push("filler".to_string(), Duration::from_millis(10))
                .await
        );

        let (_h, mut healthy_rx) = registry.register(to, ConnectionId::new()).expect("healthy");

        let report = dispatcher
            .dispatch(DispatchTarget::User(to), &payload_to(from, to))
            .await
            .expect("dispatch");

        // The wedged push times out; the healthy session still gets the frame.
        assert_eq!(report.attempted, 2);
        assert_eq!(report.delivered, 1);
        assert!(healthy_rx.try_recv().is_ok());
    }

    #[tokio::test]
    async fn test_dispatch_after_unregister_sees_fresh_snapshot() {
        let (registry, dispatcher) = dispatcher_with(HashMap::new());
        let from = UserId::new();
        let to = UserId::new();
        let conn = ConnectionId::new();

        let (_h, mut rx) = registry.register(to, conn).expect("register");
        registry.unregister(&conn);

        let report = dispatcher
            .dispatch(DispatchTarget::User(to), &payload_to(from, to))
            .await
            .expect("dispatch");
        assert_eq!(report.attempted, 0);
        assert!(rx.try_recv().is_err());
    }
}
