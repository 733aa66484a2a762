//! Learning API models

pub mod model;

pub use model::*;
