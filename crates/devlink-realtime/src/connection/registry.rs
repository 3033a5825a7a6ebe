//! Session registry — tracks all live connections indexed by user.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::mpsc;
use tracing::{info, warn};

use devlink_core::error::AppError;
use devlink_core::result::AppResult;
use devlink_core::types::{ConnectionId, UserId};

use super::handle::ConnectionHandle;

/// Thread-safe registry of all live connections.
///
/// The registry exclusively owns session lifecycle: connections enter via
/// [`register`](Self::register) and leave via [`unregister`](Self::unregister).
/// A user may hold any number of concurrent connections (multi-device).
#[derive(Debug)]
pub struct SessionRegistry {
    /// User ID → connection handles for that user.
    by_user: DashMap<UserId, Vec<Arc<ConnectionHandle>>>,
    /// Connection ID → handle for direct lookup.
    by_id: DashMap<ConnectionId, Arc<ConnectionHandle>>,
    /// Outbound buffer size for new connections.
    buffer_size: usize,
}

impl SessionRegistry {
    /// Creates a new empty registry.
    pub fn new(buffer_size: usize) -> Self {
        Self {
            by_user: DashMap::new(),
            by_id: DashMap::new(),
            buffer_size,
        }
    }

    /// Registers a new authenticated connection.
    ///
    /// Returns the connection handle and the receiver for its outbound
    /// queue. Fails with a conflict only when the exact (user, connection)
    /// pair is already registered.
    pub fn register(
        &self,
        user_id: UserId,
        conn_id: ConnectionId,
    ) -> AppResult<(Arc<ConnectionHandle>, mpsc::Receiver<String>)> {
        if self.by_id.contains_key(&conn_id) {
            warn!(conn_id = %conn_id, user_id = %user_id, "Duplicate connection registration");
            return Err(AppError::conflict(format!(
                "Connection {conn_id} already registered"
            )));
        }

        let (tx, rx) = mpsc::channel(self.buffer_size);
        let handle = Arc::new(ConnectionHandle::new(conn_id, user_id, tx));

        self.by_id.insert(conn_id, handle.clone());
        self.by_user.entry(user_id).or_default().push(handle.clone());

        info!(conn_id = %conn_id, user_id = %user_id, "Connection registered");
        Ok((handle, rx))
    }

    /// Unregisters a connection.
    ///
    /// A no-op when the connection is already gone — disconnect events may
    /// arrive after logical cleanup.
    pub fn unregister(&self, conn_id: &ConnectionId) -> Option<Arc<ConnectionHandle>> {
        let (_, handle) = self.by_id.remove(conn_id)?;
        handle.mark_closed();

        if let Some(mut connections) = self.by_user.get_mut(&handle.user_id) {
            connections.retain(|c| c.id != *conn_id);
            if connections.is_empty() {
                drop(connections);
                self.by_user.remove(&handle.user_id);
            }
        }

        info!(conn_id = %conn_id, user_id = %handle.user_id, "Connection unregistered");
        Some(handle)
    }

    /// Point-in-time snapshot of a user's live connections.
    ///
    /// Callers re-query for a fresh view; there is no invalidation callback.
    pub fn sessions_for(&self, user_id: &UserId) -> Vec<Arc<ConnectionHandle>> {
        self.by_user
            .get(user_id)
            .map(|entry| entry.value().clone())
            .unwrap_or_default()
    }

    /// Gets a specific connection by ID.
    pub fn get(&self, conn_id: &ConnectionId) -> Option<Arc<ConnectionHandle>> {
        self.by_id.get(conn_id).map(|entry| entry.value().clone())
    }

    /// Returns the total live connection count.
    pub fn connection_count(&self) -> usize {
        self.by_id.len()
    }

    /// Returns the number of unique connected users.
    pub fn user_count(&self) -> usize {
        self.by_user.len()
    }

    /// Checks whether a user has at least one live connection.
    pub fn is_user_connected(&self, user_id: &UserId) -> bool {
        self.by_user.contains_key(user_id)
    }

    /// Closes and removes all connections.
    pub fn close_all(&self) {
        let ids: Vec<ConnectionId> = self.by_id.iter().map(|entry| *entry.key()).collect();
        for id in &ids {
            self.unregister(id);
        }
        if !ids.is_empty() {
            info!(count = ids.len(), "All connections closed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_multi_device() {
        let registry = SessionRegistry::new(8);
        let user = UserId::new();

        registry.register(user, ConnectionId::new()).expect("first");
        registry
            .register(user, ConnectionId::new())
            .expect("second");

        assert_eq!(registry.sessions_for(&user).len(), 2);
        assert_eq!(registry.connection_count(), 2);
        assert_eq!(registry.user_count(), 1);
    }

    #[test]
    fn test_register_duplicate_pair_fails() {
        let registry = SessionRegistry::new(8);
        let user = UserId::new();
        let conn = ConnectionId::new();

        registry.register(user, conn).expect("first");
        let err = registry.register(user, conn).expect_err("duplicate");
        assert!(err.is_kind(devlink_core::error::ErrorKind::Conflict));
        assert_eq!(registry.sessions_for(&user).len(), 1);
    }

    #[test]
    fn test_unregister_is_noop_when_absent() {
        let registry = SessionRegistry::new(8);
        assert!(registry.unregister(&ConnectionId::new()).is_none());
    }

    #[test]
    fn test_unregister_removes_from_snapshot() {
        let registry = SessionRegistry::new(8);
        let user = UserId::new();
        let conn = ConnectionId::new();

        let (handle, _rx) = registry.register(user, conn).expect("register");
        assert!(registry.is_user_connected(&user));

        registry.unregister(&conn);
        assert!(registry.sessions_for(&user).is_empty());
        assert!(!registry.is_user_connected(&user));
        assert!(!handle.is_alive());
    }

    #[test]
    fn test_snapshot_is_point_in_time() {
        let registry = SessionRegistry::new(8);
        let user = UserId::new();
        let conn = ConnectionId::new();

        registry.register(user, conn).expect("register");
        let snapshot = registry.sessions_for(&user);

        registry.unregister(&conn);
        // The old snapshot still holds the handle; a fresh query does not.
        assert_eq!(snapshot.len(), 1);
        assert!(registry.sessions_for(&user).is_empty());
    }
}
