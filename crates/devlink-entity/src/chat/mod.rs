//! Direct messaging entities.

pub mod model;

pub use model::{DirectChatSummary, DirectMessage};
