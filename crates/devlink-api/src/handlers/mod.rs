//! HTTP request handlers.

pub mod community;
pub mod direct_message;
pub mod health;
pub mod notification;
pub mod ws;
