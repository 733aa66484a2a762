//! Utility functions for Masar
//!
//! Common helper functions used across the codebase.

use std::sync::LazyLock;

/// Regex pattern for validating URL slugs
static SLUG_PATTERN: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new("^[a-z0-9]+(?:-[a-z0-9]+)*$").expect("Invalid regex pattern"));

/// Validate a string is a well-formed slug
///
/// Allowed: lowercase alphanumeric segments joined by single hyphens.
///
/// # Examples
///
/// ```
/// use masar_common::is_valid_slug;
///
/// assert!(is_valid_slug("intro-to-rust"));
/// assert!(is_valid_slug("sql101"));
/// assert!(!is_valid_slug("With Spaces"));
/// assert!(!is_valid_slug("double--hyphen"));
/// ```
pub fn is_valid_slug(str: &str) -> bool {
    SLUG_PATTERN.is_match(str)
}

/// Derive a slug from a free-form title
///
/// Lowercases, replaces non-alphanumeric runs with single hyphens, and trims
/// leading/trailing hyphens.
///
/// # Examples
///
/// ```
/// use masar_common::slugify;
///
/// assert_eq!(slugify("Intro to Rust!"), "intro-to-rust");
/// assert_eq!(slugify("  SQL / 101  "), "sql-101");
/// ```
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut last_hyphen = true;

    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_hyphen = false;
        } else if !last_hyphen {
            slug.push('-');
            last_hyphen = true;
        }
    }

    while slug.ends_with('-') {
        slug.pop();
    }

    slug
}

/// Current time as a naive UTC datetime, the storage format for all
/// `gmt_create`/`gmt_modified` columns.
pub fn now_timestamp() -> chrono::NaiveDateTime {
    chrono::Utc::now().naive_utc()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_slug() {
        assert!(is_valid_slug("intro-to-rust"));
        assert!(is_valid_slug("a"));
        assert!(is_valid_slug("course-101"));
        assert!(!is_valid_slug(""));
        assert!(!is_valid_slug("Upper-Case"));
        assert!(!is_valid_slug("-leading"));
        assert!(!is_valid_slug("trailing-"));
        assert!(!is_valid_slug("a--b"));
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Intro to Rust!"), "intro-to-rust");
        assert_eq!(slugify("  Already-Sluggish  "), "already-sluggish");
        assert_eq!(slugify("C# for Beginners"), "c-for-beginners");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_slugify_round_trips_valid() {
        for title in ["Data Engineering 101", "Rust, the Hard Parts", "x"] {
            assert!(is_valid_slug(&slugify(title)), "slugify({title:?})");
        }
    }
}
