//! Masar Server - HTTP surface of the e-learning platform
//!
//! Wires configuration, state, authentication middleware, and the versioned
//! API routes over the catalog/learning/auth service crates.

pub mod api;
pub mod middleware;
pub mod model;
pub mod security;
pub mod startup;

pub use security::Secured;
