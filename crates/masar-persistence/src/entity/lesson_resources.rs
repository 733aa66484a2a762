//! Downloadable or linked lesson resources
//!
//! `resource_type` is the discriminator (PDF/ZIP/URL); `location` holds a
//! content-dir path for files and an absolute URL for links.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "lesson_resources")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub lesson_id: i64,
    /// PDF, ZIP, or URL
    pub resource_type: String,
    pub title: String,
    pub location: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
