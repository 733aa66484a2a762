//! Lesson content payload
//!
//! One row per lesson. `content_type` is the discriminator (VIDEO/ARTICLE);
//! the unused variant's columns stay NULL.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "lesson_contents")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub lesson_id: i64,
    /// VIDEO or ARTICLE
    pub content_type: String,
    #[sea_orm(nullable)]
    pub video_url: Option<String>,
    /// Hosting provider hint for the player (e.g. youtube, vimeo, hosted)
    #[sea_orm(nullable)]
    pub playback_provider: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub article_body: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
