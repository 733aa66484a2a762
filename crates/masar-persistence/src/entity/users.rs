//! User accounts
//!
//! One row per account; the `role` column distinguishes students,
//! instructors, and admins.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub username: String,
    /// bcrypt hash, never the plaintext
    pub password: String,
    #[sea_orm(unique)]
    pub email: String,
    pub display_name: String,
    /// ROLE_STUDENT, ROLE_INSTRUCTOR, or ROLE_ADMIN
    pub role: String,
    pub enabled: bool,
    pub gmt_create: DateTime,
    pub gmt_modified: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
