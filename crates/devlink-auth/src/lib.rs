//! # devlink-auth
//!
//! Identity verification for DevLink. Accounts and credential issuance live
//! in the platform's account system; this crate only validates the JWTs it
//! mints and hands a verified identity to the rest of the application.

pub mod claims;
pub mod decoder;

pub use claims::Claims;
pub use decoder::JwtDecoder;
