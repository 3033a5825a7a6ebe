//! Direct messaging service.

pub mod service;

pub use service::DirectMessageService;
