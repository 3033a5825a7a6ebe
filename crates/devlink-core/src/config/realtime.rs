//! Real-time WebSocket engine configuration.

use serde::{Deserialize, Serialize};

/// Real-time (WebSocket) engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeConfig {
    /// Internal per-connection outbound buffer size.
    #[serde(default = "default_channel_buffer")]
    pub channel_buffer_size: usize,
    /// Per-connection push timeout in milliseconds. A push that does not
    /// complete within this window is abandoned and counted as undelivered.
    #[serde(default = "default_push_timeout")]
    pub push_timeout_ms: u64,
    /// Notification retention settings.
    #[serde(default)]
    pub notifications: NotificationRetentionConfig,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            channel_buffer_size: default_channel_buffer(),
            push_timeout_ms: default_push_timeout(),
            notifications: NotificationRetentionConfig::default(),
        }
    }
}

/// Retention settings for stored notifications.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationRetentionConfig {
    /// Number of days after which stored notifications are cleaned up.
    #[serde(default = "default_cleanup_days")]
    pub cleanup_after_days: u32,
    /// Interval between cleanup passes in minutes.
    #[serde(default = "default_cleanup_interval")]
    pub cleanup_interval_minutes: u64,
}

impl Default for NotificationRetentionConfig {
    fn default() -> Self {
        Self {
            cleanup_after_days: default_cleanup_days(),
            cleanup_interval_minutes: default_cleanup_interval(),
        }
    }
}

fn default_channel_buffer() -> usize {
    256
}

fn default_push_timeout() -> u64 {
    3000
}

fn default_cleanup_days() -> u32 {
    30
}

fn default_cleanup_interval() -> u64 {
    60
}
