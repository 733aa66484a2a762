//! Authentication and authorization models
//!
//! This file defines data structures for users, profiles, and JWT tokens.

use serde::{Deserialize, Serialize};

use masar_persistence::entity::{instructor_profiles, student_profiles, users};

// Auth configuration keys
pub const MASAR_AUTH_ENABLED: &str = "masar.auth.enabled";
pub const TOKEN_SECRET_KEY: &str = "masar.auth.token.secret.key";
pub const DEFAULT_TOKEN_SECRET_KEY: &str = "";
pub const TOKEN_EXPIRE_SECONDS: &str = "masar.auth.token.expire.seconds";
pub const DEFAULT_TOKEN_EXPIRE_SECONDS: i64 = 18000;

pub const AUTHORIZATION_HEADER: &str = "Authorization";
pub const TOKEN_PREFIX: &str = "Bearer ";
pub const PARAM_USERNAME: &str = "username";
pub const PARAM_PASSWORD: &str = "password";
pub const USER_NOT_FOUND_MESSAGE: &str =
    "User not found! Please check user exist or password is right!";

/// User account as exposed to the API (no password hash)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub display_name: String,
    pub role: String,
    pub enabled: bool,
    pub create_time: i64,
}

impl From<users::Model> for User {
    fn from(value: users::Model) -> Self {
        Self {
            id: value.id,
            username: value.username,
            email: value.email,
            display_name: value.display_name,
            role: value.role,
            enabled: value.enabled,
            create_time: value.gmt_create.and_utc().timestamp_millis(),
        }
    }
}

impl From<&users::Model> for User {
    fn from(value: &users::Model) -> Self {
        Self {
            id: value.id,
            username: value.username.to_string(),
            email: value.email.to_string(),
            display_name: value.display_name.to_string(),
            role: value.role.to_string(),
            enabled: value.enabled,
            create_time: value.gmt_create.and_utc().timestamp_millis(),
        }
    }
}

/// Authenticated user with a freshly issued token
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatedUser {
    pub username: String,
    pub role: String,
    pub token: String,
    pub token_ttl: i64,
}

/// JWT payload carried in Masar access tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MasarJwtPayload {
    pub sub: String,
    pub role: String,
    pub exp: i64,
}

/// Student profile joined onto its user
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentProfile {
    pub user_id: i64,
    pub bio: Option<String>,
    pub interests: Option<String>,
}

impl From<student_profiles::Model> for StudentProfile {
    fn from(value: student_profiles::Model) -> Self {
        Self {
            user_id: value.user_id,
            bio: value.bio,
            interests: value.interests,
        }
    }
}

/// Instructor profile joined onto its user
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstructorProfile {
    pub user_id: i64,
    pub headline: Option<String>,
    pub bio: Option<String>,
    pub website: Option<String>,
}

impl From<instructor_profiles::Model> for InstructorProfile {
    fn from(value: instructor_profiles::Model) -> Self {
        Self {
            user_id: value.user_id,
            headline: value.headline,
            bio: value.bio,
            website: value.website,
        }
    }
}

/// Per-request authentication context built by the server middleware
#[derive(Debug, Clone, Default)]
pub struct AuthContext {
    pub token_provided: bool,
    pub username: String,
    pub role: String,
    pub jwt_error: Option<jsonwebtoken::errors::Error>,
}

impl AuthContext {
    pub fn jwt_error_string(&self) -> String {
        self.jwt_error
            .as_ref()
            .map(|e| e.to_string())
            .unwrap_or_default()
    }
}
