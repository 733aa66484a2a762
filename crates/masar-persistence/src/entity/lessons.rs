//! Lessons inside a module
//!
//! Unique on (module_id, position). `duration_seconds` drives the
//! duration-weighted progress computation.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "lessons")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub module_id: i64,
    pub title: String,
    pub position: i32,
    pub duration_seconds: i64,
    /// VIDEO or ARTICLE
    pub kind: String,
    /// Previewable without enrollment
    pub preview: bool,
    pub gmt_create: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
