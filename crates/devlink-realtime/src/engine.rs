//! Realtime engine — wires the fan-out components together.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use devlink_core::config::realtime::RealtimeConfig;
use devlink_service::notification::NotificationService;

use crate::connection::registry::SessionRegistry;
use crate::dispatch::dispatcher::EventDispatcher;
use crate::membership::{MembershipProvider, RoomMembership};
use crate::notification::fanout::NotificationFanout;

/// Bundle of the real-time fan-out components.
///
/// Constructed once at startup and passed explicitly to everything that
/// dispatches; there is no ambient global registry.
#[derive(Debug, Clone)]
pub struct RealtimeEngine {
    /// Live connection registry.
    pub registry: Arc<SessionRegistry>,
    /// Channel membership resolver.
    pub membership: Arc<RoomMembership>,
    /// Best-effort event dispatcher.
    pub dispatcher: Arc<EventDispatcher>,
    /// Ledger-first notification fan-out.
    pub fanout: Arc<NotificationFanout>,
}

impl RealtimeEngine {
    /// Creates the engine from configuration and its collaborators.
    pub fn new(
        config: &RealtimeConfig,
        membership_provider: Arc<dyn MembershipProvider>,
        notifications: Arc<NotificationService>,
    ) -> Self {
        let registry = Arc::new(SessionRegistry::new(config.channel_buffer_size));
        let membership = Arc::new(RoomMembership::new(membership_provider));
        let dispatcher = Arc::new(EventDispatcher::new(
            registry.clone(),
            membership.clone(),
            Duration::from_millis(config.push_timeout_ms),
        ));
        let fanout = Arc::new(NotificationFanout::new(
            notifications,
            membership.clone(),
            dispatcher.clone(),
        ));

        Self {
            registry,
            membership,
            dispatcher,
            fanout,
        }
    }

    /// Closes all live connections during shutdown.
    pub fn shutdown(&self) {
        info!(
            connections = self.registry.connection_count(),
            "Shutting down realtime engine"
        );
        self.registry.close_all();
    }
}
