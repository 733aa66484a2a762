//! Input validation utilities for Masar API
//!
//! This module provides validation functions for API requests.

use validator::ValidationError;

/// Maximum length for title fields
pub const MAX_TITLE_LENGTH: usize = 256;

/// Maximum length for slug field
pub const MAX_SLUG_LENGTH: usize = 128;

/// Maximum length for description/body fields (1MB)
pub const MAX_BODY_LENGTH: usize = 1024 * 1024;

/// Maximum length for username field
pub const MAX_USERNAME_LENGTH: usize = 64;

/// Maximum length for password field (bcrypt input limit)
pub const MAX_PASSWORD_LENGTH: usize = 72;

/// Minimum length for password field
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum lesson duration (24h)
pub const MAX_LESSON_DURATION_SECONDS: i64 = 24 * 3600;

/// Validate title format
///
/// Titles must not be empty or exceed MAX_TITLE_LENGTH characters.
pub fn validate_title(title: &str) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(ValidationError::new("title_empty"));
    }
    if title.len() > MAX_TITLE_LENGTH {
        return Err(ValidationError::new("title_too_long"));
    }
    Ok(())
}

/// Validate slug format (may be empty; one is derived from the title then)
pub fn validate_slug(slug: &str) -> Result<(), ValidationError> {
    if slug.len() > MAX_SLUG_LENGTH {
        return Err(ValidationError::new("slug_too_long"));
    }
    if !slug.is_empty() && !masar_common::is_valid_slug(slug) {
        return Err(ValidationError::new("slug_invalid_chars"));
    }
    Ok(())
}

/// Validate username format
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    if username.is_empty() {
        return Err(ValidationError::new("username_empty"));
    }
    if username.len() > MAX_USERNAME_LENGTH {
        return Err(ValidationError::new("username_too_long"));
    }
    if !username
        .chars()
        .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == '_')
    {
        return Err(ValidationError::new("username_invalid_chars"));
    }
    Ok(())
}

/// Validate password length bounds
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::new("password_too_short"));
    }
    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(ValidationError::new("password_too_long"));
    }
    Ok(())
}

/// Validate lesson duration bounds
pub fn validate_duration(duration_seconds: i64) -> Result<(), ValidationError> {
    if duration_seconds < 0 {
        return Err(ValidationError::new("duration_negative"));
    }
    if duration_seconds > MAX_LESSON_DURATION_SECONDS {
        return Err(ValidationError::new("duration_too_long"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_title() {
        assert!(validate_title("Intro to Rust").is_ok());
        assert!(validate_title("").is_err());
        assert!(validate_title("   ").is_err());
        assert!(validate_title(&"x".repeat(MAX_TITLE_LENGTH + 1)).is_err());
    }

    #[test]
    fn test_validate_slug() {
        assert!(validate_slug("").is_ok());
        assert!(validate_slug("intro-to-rust").is_ok());
        assert!(validate_slug("Has Spaces").is_err());
        assert!(validate_slug(&"a".repeat(MAX_SLUG_LENGTH + 1)).is_err());
    }

    #[test]
    fn test_validate_username() {
        assert!(validate_username("jana.k").is_ok());
        assert!(validate_username("").is_err());
        assert!(validate_username("bad user").is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("longenough").is_ok());
        assert!(validate_password("short").is_err());
        assert!(validate_password(&"p".repeat(MAX_PASSWORD_LENGTH + 1)).is_err());
    }

    #[test]
    fn test_validate_duration() {
        assert!(validate_duration(0).is_ok());
        assert!(validate_duration(3600).is_ok());
        assert!(validate_duration(-1).is_err());
        assert!(validate_duration(MAX_LESSON_DURATION_SECONDS + 1).is_err());
    }
}
