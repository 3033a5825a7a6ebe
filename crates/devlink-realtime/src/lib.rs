//! # devlink-realtime
//!
//! Real-time fan-out engine for DevLink. Provides:
//!
//! - Session registry mapping users to their live WebSocket connections
//! - Channel membership resolution (direct pairs, communities)
//! - Best-effort concurrent event dispatch with per-push timeouts
//! - Notification fan-out with a durable-ledger-first ordering rule
//!
//! Live delivery is an optimization: the notification ledger is the system
//! of record, and clients reconcile missed pushes by polling it.

pub mod connection;
pub mod dispatch;
pub mod engine;
pub mod membership;
pub mod message;
pub mod notification;

pub use connection::registry::SessionRegistry;
pub use dispatch::dispatcher::EventDispatcher;
pub use engine::RealtimeEngine;
pub use membership::{MembershipProvider, RoomMembership};
pub use notification::fanout::NotificationFanout;
