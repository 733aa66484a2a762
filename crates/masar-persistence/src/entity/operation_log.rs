//! Operation log entity for audit logging
//!
//! Tracks mutating operations (auth, authoring, moderation) for audit
//! purposes.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "operation_log")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Operation type: CREATE, UPDATE, DELETE, LOGIN, REGISTER, APPROVE, REJECT, etc.
    pub operation: String,
    /// Resource type: USER, COURSE, TRACK, MODULE, LESSON, ENROLLMENT, CERTIFICATE
    pub resource_type: String,
    /// Resource identifier
    #[sea_orm(column_type = "Text", nullable)]
    pub resource_id: Option<String>,
    /// User who performed the operation
    pub operator: String,
    /// Source IP address
    #[sea_orm(column_type = "Text", nullable)]
    pub source_ip: Option<String>,
    /// Operation result: SUCCESS, FAILURE
    pub result: String,
    /// Error message if operation failed
    #[sea_orm(column_type = "Text", nullable)]
    pub error_message: Option<String>,
    /// Additional details in JSON format
    #[sea_orm(column_type = "Text", nullable)]
    pub details: Option<String>,
    /// When the operation occurred
    pub gmt_create: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
