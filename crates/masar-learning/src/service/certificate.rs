//! Certificate service
//!
//! One certificate per student and learning entity, keyed by a unique
//! serial. Certificates download as a printable self-contained HTML
//! document.

use masar_api::learning::CertificateView;
use masar_api::model::CERTIFICATE_SERIAL_PREFIX;
use masar_common::error::MasarError;
use masar_common::now_timestamp;
use masar_persistence::entity::{certificates, learning_entities, users};
use masar_persistence::sea_orm::*;

use super::notification;

/// Issue a certificate unless the student already holds one for the entity.
///
/// Returns the freshly issued row, or `None` when one already existed.
pub async fn issue_if_absent(
    db: &DatabaseConnection,
    student_id: i64,
    entity_id: i64,
    certificate_type: &str,
) -> anyhow::Result<Option<certificates::Model>> {
    let existing = certificates::Entity::find()
        .filter(certificates::Column::StudentId.eq(student_id))
        .filter(certificates::Column::EntityId.eq(entity_id))
        .one(db)
        .await?;

    if existing.is_some() {
        return Ok(None);
    }

    let serial = new_serial();
    let row = certificates::ActiveModel {
        id: NotSet,
        certificate_type: Set(certificate_type.to_string()),
        student_id: Set(student_id),
        entity_id: Set(entity_id),
        serial_number: Set(serial.clone()),
        issued_at: Set(now_timestamp()),
    }
    .insert(db)
    .await?;

    let entity_title = learning_entities::Entity::find_by_id(entity_id)
        .one(db)
        .await?
        .map(|e| e.title)
        .unwrap_or_default();

    notification::push(
        db,
        student_id,
        "Certificate earned",
        &format!(
            "Congratulations! You completed \"{}\". Certificate {} is ready to download.",
            entity_title, serial
        ),
    )
    .await?;

    tracing::info!(student_id, entity_id, serial = %row.serial_number, "certificate issued");

    Ok(Some(row))
}

pub fn new_serial() -> String {
    format!(
        "{}{}",
        CERTIFICATE_SERIAL_PREFIX,
        uuid::Uuid::new_v4().simple().to_string().to_uppercase()
    )
}

pub async fn find_by_student(
    db: &DatabaseConnection,
    student_id: i64,
) -> anyhow::Result<Vec<CertificateView>> {
    let rows = certificates::Entity::find()
        .filter(certificates::Column::StudentId.eq(student_id))
        .order_by_desc(certificates::Column::IssuedAt)
        .all(db)
        .await?;

    let mut views = Vec::with_capacity(rows.len());
    for row in rows {
        views.push(to_view(db, row).await?);
    }

    Ok(views)
}

/// Public serial lookup, also backing the download endpoint.
pub async fn verify(
    db: &DatabaseConnection,
    serial_number: &str,
) -> anyhow::Result<Option<CertificateView>> {
    let row = certificates::Entity::find()
        .filter(certificates::Column::SerialNumber.eq(serial_number))
        .one(db)
        .await?;

    match row {
        Some(row) => Ok(Some(to_view(db, row).await?)),
        None => Ok(None),
    }
}

pub async fn find_owned_by_serial(
    db: &DatabaseConnection,
    student_id: i64,
    serial_number: &str,
) -> anyhow::Result<CertificateView> {
    let view = verify(db, serial_number)
        .await?
        .ok_or_else(|| MasarError::CertificateNotExist(serial_number.to_string()))?;

    let row = certificates::Entity::find()
        .filter(certificates::Column::SerialNumber.eq(serial_number))
        .one(db)
        .await?
        .ok_or_else(|| MasarError::CertificateNotExist(serial_number.to_string()))?;

    if row.student_id != student_id {
        return Err(MasarError::CertificateNotExist(serial_number.to_string()).into());
    }

    Ok(view)
}

async fn to_view(
    db: &DatabaseConnection,
    row: certificates::Model,
) -> anyhow::Result<CertificateView> {
    let entity_title = learning_entities::Entity::find_by_id(row.entity_id)
        .one(db)
        .await?
        .map(|e| e.title)
        .unwrap_or_default();

    let student_name = users::Entity::find_by_id(row.student_id)
        .one(db)
        .await?
        .map(|u| u.display_name)
        .unwrap_or_default();

    Ok(CertificateView {
        id: row.id,
        certificate_type: row.certificate_type,
        entity_id: row.entity_id,
        entity_title,
        student_name,
        serial_number: row.serial_number,
        issued_at: row.issued_at.and_utc().timestamp_millis(),
    })
}

/// Render a certificate as a printable standalone HTML document.
pub fn render_html(view: &CertificateView) -> String {
    let issued = chrono::DateTime::from_timestamp_millis(view.issued_at)
        .map(|t| t.format("%Y-%m-%d").to_string())
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Certificate {serial}</title>
<style>
body {{ font-family: Georgia, serif; text-align: center; margin: 4em; }}
.frame {{ border: 6px double #2c3e50; padding: 4em; }}
h1 {{ letter-spacing: 0.2em; text-transform: uppercase; }}
.name {{ font-size: 2em; margin: 1em 0; }}
.serial {{ color: #777; font-size: 0.8em; margin-top: 3em; }}
</style>
</head>
<body>
<div class="frame">
<h1>Certificate of Completion</h1>
<p>This certifies that</p>
<p class="name">{student}</p>
<p>has successfully completed</p>
<p class="name">{title}</p>
<p>on {issued}</p>
<p class="serial">Serial: {serial}</p>
</div>
</body>
</html>
"#,
        serial = view.serial_number,
        student = view.student_name,
        title = view.entity_title,
        issued = issued,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_serial_shape() {
        let serial = new_serial();
        assert!(serial.starts_with(CERTIFICATE_SERIAL_PREFIX));
        assert_eq!(serial.len(), CERTIFICATE_SERIAL_PREFIX.len() + 32);
        assert!(
            serial[CERTIFICATE_SERIAL_PREFIX.len()..]
                .chars()
                .all(|c| c.is_ascii_hexdigit())
        );
    }

    #[test]
    fn test_new_serial_unique() {
        assert_ne!(new_serial(), new_serial());
    }

    #[test]
    fn test_render_html_contains_fields() {
        let view = CertificateView {
            id: 1,
            certificate_type: "COURSE".to_string(),
            entity_id: 7,
            entity_title: "Intro to Rust".to_string(),
            student_name: "Amal K".to_string(),
            serial_number: "MSR-ABC123".to_string(),
            issued_at: 1_700_000_000_000,
        };

        let html = render_html(&view);
        assert!(html.contains("Intro to Rust"));
        assert!(html.contains("Amal K"));
        assert!(html.contains("MSR-ABC123"));
        assert!(html.starts_with("<!DOCTYPE html>"));
    }
}
