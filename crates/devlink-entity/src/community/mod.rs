//! Community entities.

pub mod model;

pub use model::{Community, CommunityMessage};
