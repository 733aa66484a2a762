//! Audit trail writer
//!
//! Records mutating operations into `operation_log`. Failures to write an
//! audit row are logged and swallowed so they never fail the operation
//! being audited.

use sea_orm::*;

use crate::entity::operation_log;

pub const RESULT_SUCCESS: &str = "SUCCESS";
pub const RESULT_FAILURE: &str = "FAILURE";

pub struct AuditEntry<'a> {
    pub operation: &'a str,
    pub resource_type: &'a str,
    pub resource_id: Option<String>,
    pub operator: &'a str,
    pub source_ip: Option<String>,
    pub result: &'a str,
    pub error_message: Option<String>,
    pub details: Option<String>,
}

pub async fn record(db: &DatabaseConnection, entry: AuditEntry<'_>) {
    let row = operation_log::ActiveModel {
        id: NotSet,
        operation: Set(entry.operation.to_string()),
        resource_type: Set(entry.resource_type.to_string()),
        resource_id: Set(entry.resource_id),
        operator: Set(entry.operator.to_string()),
        source_ip: Set(entry.source_ip),
        result: Set(entry.result.to_string()),
        error_message: Set(entry.error_message),
        details: Set(entry.details),
        gmt_create: Set(chrono::Utc::now().naive_utc()),
    };

    if let Err(e) = row.insert(db).await {
        tracing::warn!("failed to write operation log entry: {}", e);
    }
}
