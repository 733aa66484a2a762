//! Issued certificates
//!
//! Unique on (student_id, entity_id) and on serial_number. `certificate_type`
//! mirrors the learning entity's discriminator.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "certificates")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// COURSE or TRACK
    pub certificate_type: String,
    pub student_id: i64,
    pub entity_id: i64,
    #[sea_orm(unique)]
    pub serial_number: String,
    pub issued_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
