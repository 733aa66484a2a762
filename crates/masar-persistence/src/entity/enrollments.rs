//! Student enrollments in courses and tracks
//!
//! Unique on (student_id, entity_id). `enrollment_type` mirrors the
//! learning entity's discriminator. `progress_percentage` is denormalized
//! here and recomputed on every lesson completion change.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "enrollments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// COURSE or TRACK
    pub enrollment_type: String,
    pub student_id: i64,
    pub entity_id: i64,
    pub progress_percentage: f64,
    pub enrolled_at: DateTime,
    #[sea_orm(nullable)]
    pub completed_at: Option<DateTime>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
