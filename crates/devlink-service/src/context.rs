//! Per-request caller context.

use devlink_core::types::UserId;

/// The verified identity a request acts on behalf of.
///
/// Constructed by the API layer after token validation; services trust it
/// without re-checking credentials.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// The authenticated user.
    pub user_id: UserId,
    /// Username, carried for notification body text.
    pub username: String,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(user_id: UserId, username: impl Into<String>) -> Self {
        Self {
            user_id,
            username: username.into(),
        }
    }
}
