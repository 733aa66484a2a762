//! Common test utilities for integration testing
//!
//! This module provides shared test infrastructure:
//! - TestClient: HTTP client for API testing against a running server

#[allow(dead_code, unused_imports)]
pub mod client;

pub use client::TestClient;

/// Default admin test credentials (seeded out of band)
pub const TEST_ADMIN_USERNAME: &str = "admin";
pub const TEST_ADMIN_PASSWORD: &str = "masar-admin";

/// Server URL
pub const BASE_URL: &str = "http://127.0.0.1:8080/masar";

/// Generate a unique test ID to avoid conflicts between tests
pub fn unique_test_id() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("test_{}", timestamp)
}

/// Generate a unique username
#[allow(dead_code)]
pub fn unique_username(prefix: &str) -> String {
    format!("{}_{}", prefix, unique_test_id())
}

/// Generate a unique slug
#[allow(dead_code)]
pub fn unique_slug(prefix: &str) -> String {
    format!("{}-{}", prefix, unique_test_id().replace('_', "-"))
}
