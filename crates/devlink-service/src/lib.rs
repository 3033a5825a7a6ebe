//! # devlink-service
//!
//! Business logic services for DevLink — orchestrates repositories behind
//! the notification ledger, direct messaging, and community operations.

pub mod chat;
pub mod community;
pub mod context;
pub mod notification;

pub use context::RequestContext;
pub use notification::ledger::NotificationLedger;
pub use notification::service::NotificationService;
