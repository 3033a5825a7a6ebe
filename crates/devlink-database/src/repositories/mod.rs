//! Concrete repository implementations.

pub mod community;
pub mod direct_message;
pub mod notification;
