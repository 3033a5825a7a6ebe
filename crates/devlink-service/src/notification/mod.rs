//! Notification ledger service and storage backends.

pub mod ledger;
pub mod memory;
pub mod service;

pub use ledger::NotificationLedger;
pub use memory::MemoryNotificationLedger;
pub use service::NotificationService;
