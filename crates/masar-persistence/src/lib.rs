//! Masar Persistence - Database entities and persistence layer
//!
//! This crate provides:
//! - SeaORM entity definitions for the full learning schema
//! - The audit trail writer shared by the service crates

pub mod audit;
pub mod entity;

// Re-export sea-orm for convenience
pub use sea_orm;

// Re-export entity prelude
pub use entity::prelude::*;
