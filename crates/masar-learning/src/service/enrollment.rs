//! Enrollment service
//!
//! Enrollment rows are unique per (student, entity). Enrolling in a track
//! also enrolls the student in each member course; unenrolling from a track
//! leaves member-course enrollments (and their progress) in place.

use std::collections::HashMap;

use masar_api::Page;
use masar_api::learning::EnrollmentView;
use masar_api::model::{ENTITY_TYPE_COURSE, ENTITY_TYPE_TRACK, EntityStatus};
use masar_common::error::MasarError;
use masar_common::now_timestamp;
use masar_persistence::entity::{enrollments, learning_entities};
use masar_persistence::sea_orm::sea_query::Asterisk;
use masar_persistence::sea_orm::*;

use masar_catalog::service::track;

use super::notification;

pub async fn find(
    db: &DatabaseConnection,
    student_id: i64,
    entity_id: i64,
) -> anyhow::Result<Option<enrollments::Model>> {
    let enrollment = enrollments::Entity::find()
        .filter(enrollments::Column::StudentId.eq(student_id))
        .filter(enrollments::Column::EntityId.eq(entity_id))
        .one(db)
        .await?;

    Ok(enrollment)
}

/// Enroll a student in a published course or track.
pub async fn enroll(
    db: &DatabaseConnection,
    student_id: i64,
    entity_id: i64,
) -> anyhow::Result<enrollments::Model> {
    let entity = learning_entities::Entity::find_by_id(entity_id)
        .one(db)
        .await?
        .ok_or(MasarError::CourseNotExist(entity_id))?;

    if entity.status != EntityStatus::Published.to_string() {
        return Err(MasarError::IllegalArgument(format!(
            "'{}' is not open for enrollment",
            entity.title
        ))
        .into());
    }

    if find(db, student_id, entity_id).await?.is_some() {
        return Err(MasarError::AlreadyEnrolled(student_id, entity_id).into());
    }

    let enrollment = insert_row(db, student_id, entity_id, &entity.entity_type).await?;

    // Track enrollment fans out to member courses not yet enrolled.
    if entity.entity_type == ENTITY_TYPE_TRACK {
        for course_id in track::member_course_ids(db, entity_id).await? {
            if find(db, student_id, course_id).await?.is_none() {
                insert_row(db, student_id, course_id, ENTITY_TYPE_COURSE).await?;
            }
        }
    }

    notification::push(
        db,
        student_id,
        "Enrollment confirmed",
        &format!("You are now enrolled in \"{}\".", entity.title),
    )
    .await?;

    tracing::info!(student_id, entity_id, "student enrolled");

    Ok(enrollment)
}

async fn insert_row(
    db: &DatabaseConnection,
    student_id: i64,
    entity_id: i64,
    enrollment_type: &str,
) -> anyhow::Result<enrollments::Model> {
    let entity = enrollments::ActiveModel {
        id: NotSet,
        enrollment_type: Set(enrollment_type.to_string()),
        student_id: Set(student_id),
        entity_id: Set(entity_id),
        progress_percentage: Set(0.0),
        enrolled_at: Set(now_timestamp()),
        completed_at: Set(None),
    };

    Ok(entity.insert(db).await?)
}

pub async fn unenroll(
    db: &DatabaseConnection,
    student_id: i64,
    entity_id: i64,
) -> anyhow::Result<()> {
    let enrollment = find(db, student_id, entity_id)
        .await?
        .ok_or(MasarError::NotEnrolled(student_id, entity_id))?;

    enrollments::Entity::delete_by_id(enrollment.id)
        .exec(db)
        .await?;

    tracing::info!(student_id, entity_id, "student unenrolled");

    Ok(())
}

pub async fn find_page_by_student(
    db: &DatabaseConnection,
    student_id: i64,
    page_no: u64,
    page_size: u64,
) -> anyhow::Result<Page<EnrollmentView>> {
    let total_count = enrollments::Entity::find()
        .filter(enrollments::Column::StudentId.eq(student_id))
        .select_only()
        .column_as(prelude::Expr::col(Asterisk).count(), "count")
        .into_tuple::<i64>()
        .one(db)
        .await?
        .unwrap_or_default() as u64;

    if total_count == 0 {
        return Ok(Page::default());
    }

    let offset = (page_no - 1) * page_size;
    let rows = enrollments::Entity::find()
        .filter(enrollments::Column::StudentId.eq(student_id))
        .order_by_desc(enrollments::Column::EnrolledAt)
        .offset(offset)
        .limit(page_size)
        .all(db)
        .await?;

    let entity_ids: Vec<i64> = rows.iter().map(|e| e.entity_id).collect();
    let entities: HashMap<i64, learning_entities::Model> = learning_entities::Entity::find()
        .filter(learning_entities::Column::Id.is_in(entity_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|e| (e.id, e))
        .collect();

    let page_items = rows
        .iter()
        .map(|row| {
            let entity = entities.get(&row.entity_id);
            EnrollmentView {
                id: row.id,
                enrollment_type: row.enrollment_type.clone(),
                entity_id: row.entity_id,
                title: entity.map(|e| e.title.clone()).unwrap_or_default(),
                slug: entity.map(|e| e.slug.clone()).unwrap_or_default(),
                thumbnail_path: entity.and_then(|e| e.thumbnail_path.clone()),
                progress_percentage: row.progress_percentage,
                enrolled_at: row.enrolled_at.and_utc().timestamp_millis(),
                completed_at: row.completed_at.map(|t| t.and_utc().timestamp_millis()),
            }
        })
        .collect();

    Ok(Page::new(total_count, page_no, page_size, page_items))
}
