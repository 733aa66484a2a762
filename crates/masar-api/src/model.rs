//! Common API models and constants
//!
//! This module defines shared constants, data structures, and enums
//! used across different API modules.

use std::{
    fmt::{Display, Formatter},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

// Header and parameter keys
pub const ACCESS_TOKEN: &str = "accessToken";
pub const TOKEN_TTL: &str = "tokenTtl";
pub const USERNAME: &str = "username";

// Roles
pub const ROLE_STUDENT: &str = "ROLE_STUDENT";
pub const ROLE_INSTRUCTOR: &str = "ROLE_INSTRUCTOR";
pub const ROLE_ADMIN: &str = "ROLE_ADMIN";

// Learning entity discriminators
pub const ENTITY_TYPE_COURSE: &str = "COURSE";
pub const ENTITY_TYPE_TRACK: &str = "TRACK";

// Lesson content discriminators
pub const CONTENT_TYPE_VIDEO: &str = "VIDEO";
pub const CONTENT_TYPE_ARTICLE: &str = "ARTICLE";

// Lesson resource discriminators
pub const RESOURCE_TYPE_PDF: &str = "PDF";
pub const RESOURCE_TYPE_ZIP: &str = "ZIP";
pub const RESOURCE_TYPE_URL: &str = "URL";

// Defaults
pub const DEFAULT_PAGE_NO: u64 = 1;
pub const DEFAULT_PAGE_SIZE: u64 = 20;
pub const MAX_PAGE_SIZE: u64 = 100;

// Certificate serial prefix
pub const CERTIFICATE_SERIAL_PREFIX: &str = "MSR-";

/// Generic pagination wrapper for API responses
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub total_count: u64,
    pub page_number: u64,
    pub pages_available: u64,
    pub page_items: Vec<T>,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            total_count: 0,
            page_number: 1,
            pages_available: 0,
            page_items: vec![],
        }
    }
}

impl<T> Page<T> {
    pub fn new(total_count: u64, page_number: u64, page_size: u64, page_items: Vec<T>) -> Self {
        Self {
            total_count,
            page_number,
            pages_available: if page_size > 0 {
                (total_count as f64 / page_size as f64).ceil() as u64
            } else {
                0
            },
            page_items,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            total_count: self.total_count,
            page_number: self.page_number,
            pages_available: self.pages_available,
            page_items: self.page_items.into_iter().map(f).collect(),
        }
    }
}

/// Publication state of a course or track
#[derive(Clone, Copy, Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum EntityStatus {
    #[default]
    Draft,
    Pending,
    Published,
    Rejected,
    Archived,
}

impl EntityStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityStatus::Draft => "DRAFT",
            EntityStatus::Pending => "PENDING",
            EntityStatus::Published => "PUBLISHED",
            EntityStatus::Rejected => "REJECTED",
            EntityStatus::Archived => "ARCHIVED",
        }
    }

    /// Whether the entity is visible in the public catalog
    pub fn is_visible(&self) -> bool {
        matches!(self, EntityStatus::Published)
    }
}

impl Display for EntityStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EntityStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DRAFT" => Ok(EntityStatus::Draft),
            "PENDING" => Ok(EntityStatus::Pending),
            "PUBLISHED" => Ok(EntityStatus::Published),
            "REJECTED" => Ok(EntityStatus::Rejected),
            "ARCHIVED" => Ok(EntityStatus::Archived),
            _ => Err(format!("Invalid entity status: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_default() {
        let page: Page<String> = Page::default();
        assert_eq!(page.total_count, 0);
        assert_eq!(page.page_number, 1);
        assert!(page.page_items.is_empty());
    }

    #[test]
    fn test_page_new() {
        let items = vec!["a".to_string(), "b".to_string()];
        let page = Page::new(10, 1, 5, items);
        assert_eq!(page.total_count, 10);
        assert_eq!(page.pages_available, 2);
    }

    #[test]
    fn test_page_new_zero_page_size() {
        let page: Page<i32> = Page::new(10, 1, 0, vec![]);
        assert_eq!(page.pages_available, 0);
    }

    #[test]
    fn test_page_map() {
        let page = Page::new(2, 1, 10, vec![1, 2]);
        let mapped = page.map(|v| v * 10);
        assert_eq!(mapped.page_items, vec![10, 20]);
        assert_eq!(mapped.total_count, 2);
    }

    #[test]
    fn test_entity_status() {
        assert_eq!(EntityStatus::default(), EntityStatus::Draft);
        assert!(EntityStatus::Published.is_visible());
        assert!(!EntityStatus::Pending.is_visible());
        assert_eq!("REJECTED".parse::<EntityStatus>(), Ok(EntityStatus::Rejected));
        assert!("BOGUS".parse::<EntityStatus>().is_err());
    }
}
