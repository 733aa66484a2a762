//! Courses and tracks
//!
//! Single table for both; `entity_type` is the discriminator (COURSE/TRACK).
//! Tracks carry no instructor and own no modules, only `track_courses` rows.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "learning_entities")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// COURSE or TRACK
    pub entity_type: String,
    pub title: String,
    #[sea_orm(unique)]
    pub slug: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub category: String,
    /// Beginner, Intermediate, Advanced
    pub level: String,
    #[sea_orm(nullable)]
    pub thumbnail_path: Option<String>,
    /// Authoring instructor; NULL for tracks
    #[sea_orm(nullable)]
    pub instructor_id: Option<i64>,
    /// DRAFT, PENDING, PUBLISHED, REJECTED, ARCHIVED
    pub status: String,
    pub gmt_create: DateTime,
    pub gmt_modified: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
