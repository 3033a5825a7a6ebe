//! Individual WebSocket connection handle.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;

use devlink_core::types::{ConnectionId, UserId};

/// A handle to a single live connection.
///
/// Holds the sender half of the connection's outbound queue plus metadata
/// about the owning user. The transport task drains the receiver half and
/// writes frames to the socket.
#[derive(Debug)]
pub struct ConnectionHandle {
    /// Unique connection ID.
    pub id: ConnectionId,
    /// User who owns this connection.
    pub user_id: UserId,
    /// When the connection was established.
    pub connected_at: DateTime<Utc>,
    /// Sender for outbound frames.
    sender: mpsc::Sender<String>,
    /// Whether the connection is still alive.
    alive: AtomicBool,
}

impl ConnectionHandle {
    /// Create a new connection handle.
    pub fn new(id: ConnectionId, user_id: UserId, sender: mpsc::Sender<String>) -> Self {
        Self {
            id,
            user_id,
            connected_at: Utc::now(),
            sender,
            alive: AtomicBool::new(true),
        }
    }

    /// Push a frame to this connection, bounded by a timeout.
    ///
    /// Returns `true` on success. A push that times out is abandoned and
    /// never retried; a push to a closed connection marks the handle dead.
    pub async fn push(&self, frame: String, timeout: Duration) -> bool {
        if !self.is_alive() {
            return false;
        }
        match tokio::time::timeout(timeout, self.sender.send(frame)).await {
            Ok(Ok(())) => true,
            Ok(Err(_)) => {
                self.mark_closed();
                false
            }
            Err(_) => {
                tracing::warn!(conn_id = %self.id, "Push timed out, delivery abandoned");
                false
            }
        }
    }

    /// Check whether the connection is still alive.
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    /// Mark the connection as closed.
    pub fn mark_closed(&self) {
        self.alive.store(false, Ordering::SeqCst);
    }
}
