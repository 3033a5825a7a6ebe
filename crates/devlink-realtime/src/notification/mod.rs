//! Notification fan-out.

pub mod fanout;

pub use fanout::{FanoutReceipt, NotificationFanout};
