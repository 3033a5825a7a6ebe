//! Application state shared across all handlers.

use std::sync::Arc;

use sqlx::PgPool;

use devlink_auth::decoder::JwtDecoder;
use devlink_core::config::AppConfig;
use devlink_realtime::engine::RealtimeEngine;
use devlink_service::chat::DirectMessageService;
use devlink_service::community::CommunityService;
use devlink_service::notification::NotificationService;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// PostgreSQL connection pool.
    pub db_pool: PgPool,
    /// JWT token decoder and validator.
    pub jwt_decoder: Arc<JwtDecoder>,
    /// Notification ledger service.
    pub notification_service: Arc<NotificationService>,
    /// Direct messaging service.
    pub direct_message_service: Arc<DirectMessageService>,
    /// Community service.
    pub community_service: Arc<CommunityService>,
    /// Real-time fan-out engine.
    pub realtime: Arc<RealtimeEngine>,
}
