//! # devlink-api
//!
//! HTTP API layer for DevLink: Axum routes, handlers, request/response
//! DTOs, the authentication extractor, and the WebSocket upgrade.

pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod router;
pub mod state;

pub use error::ApiError;
pub use router::build_router;
pub use state::AppState;
