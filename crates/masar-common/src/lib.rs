//! Masar Common - Shared types and utilities
//!
//! This crate provides the foundational types used across all Masar components:
//! - Error types and error codes
//! - Utility functions
//! - Common constants

pub mod error;
pub mod utils;

// Re-exports for convenience
pub use error::{AppError, ErrorCode, MasarError};
pub use utils::{is_valid_slug, now_timestamp, slugify};

/// Query parameter names
pub const PAGE_NO: &str = "pageNo";
pub const PAGE_SIZE: &str = "pageSize";
pub const COURSE_ID: &str = "courseId";
pub const TRACK_ID: &str = "trackId";
pub const LESSON_ID: &str = "lessonId";
pub const MODULE_ID: &str = "moduleId";
pub const SERIAL_NUMBER: &str = "serialNumber";

/// Action types for audit logging
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActionTypes {
    #[default]
    Read,
    Write,
}

impl ActionTypes {
    pub fn as_str(self) -> &'static str {
        match self {
            ActionTypes::Read => "r",
            ActionTypes::Write => "w",
        }
    }
}

impl std::fmt::Display for ActionTypes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ActionTypes {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "r" => Ok(ActionTypes::Read),
            "w" => Ok(ActionTypes::Write),
            _ => Err(format!("Invalid action type: {}", s)),
        }
    }
}
