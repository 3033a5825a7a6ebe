//! # devlink-entity
//!
//! Domain entity models for DevLink: notification ledger entries, delivery
//! channels, direct messages, and communities.

pub mod channel;
pub mod chat;
pub mod community;
pub mod notification;

pub use channel::Channel;
pub use notification::{NewNotification, NotificationEntry, NotificationKind};
