//! Course service
//!
//! Authoring operations are instructor-scoped (ownership checked on every
//! mutation); catalog queries only surface published courses unless the
//! caller asks for a specific status.

use std::collections::HashMap;

use masar_api::Page;
use masar_api::catalog::{CourseDetail, CourseSummary};
use masar_api::model::{ENTITY_TYPE_COURSE, EntityStatus};
use masar_common::error::MasarError;
use masar_common::{now_timestamp, slugify};
use masar_persistence::entity::{
    enrollments, learning_entities, lesson_contents, lesson_progress, lesson_resources, lessons,
    modules, track_courses, users,
};
use masar_persistence::sea_orm::sea_query::Asterisk;
use masar_persistence::sea_orm::*;

use crate::model::{CourseFilter, build_outline, course_summary};

pub struct CourseFields {
    pub title: String,
    pub slug: Option<String>,
    pub description: String,
    pub category: String,
    pub level: String,
}

pub async fn create(
    db: &DatabaseConnection,
    instructor_id: i64,
    fields: CourseFields,
) -> anyhow::Result<learning_entities::Model> {
    let slug = match fields.slug {
        Some(s) if !s.is_empty() => s,
        _ => slugify(&fields.title),
    };

    if slug.is_empty() {
        return Err(MasarError::IllegalArgument("course slug cannot be empty".to_string()).into());
    }

    let slug_taken = learning_entities::Entity::find()
        .filter(learning_entities::Column::Slug.eq(slug.as_str()))
        .one(db)
        .await?
        .is_some();
    if slug_taken {
        return Err(
            MasarError::IllegalArgument(format!("slug '{}' already in use", slug)).into(),
        );
    }

    let now = now_timestamp();
    let entity = learning_entities::ActiveModel {
        id: NotSet,
        entity_type: Set(ENTITY_TYPE_COURSE.to_string()),
        title: Set(fields.title),
        slug: Set(slug),
        description: Set(fields.description),
        category: Set(fields.category),
        level: Set(fields.level),
        thumbnail_path: Set(None),
        instructor_id: Set(Some(instructor_id)),
        status: Set(EntityStatus::Draft.to_string()),
        gmt_create: Set(now),
        gmt_modified: Set(now),
    };

    let course = entity.insert(db).await?;

    tracing::info!(course_id = course.id, instructor_id, "course created");

    Ok(course)
}

/// Fetch a course and verify the given instructor authored it.
pub async fn find_owned(
    db: &DatabaseConnection,
    course_id: i64,
    instructor_id: i64,
) -> anyhow::Result<learning_entities::Model> {
    let course = find_by_id(db, course_id)
        .await?
        .ok_or(MasarError::CourseNotExist(course_id))?;

    if course.instructor_id != Some(instructor_id) {
        return Err(MasarError::NotCourseOwner(instructor_id, course_id).into());
    }

    Ok(course)
}

pub async fn find_by_id(
    db: &DatabaseConnection,
    course_id: i64,
) -> anyhow::Result<Option<learning_entities::Model>> {
    let course = learning_entities::Entity::find_by_id(course_id)
        .filter(learning_entities::Column::EntityType.eq(ENTITY_TYPE_COURSE))
        .one(db)
        .await?;

    Ok(course)
}

pub async fn find_by_slug(
    db: &DatabaseConnection,
    slug: &str,
) -> anyhow::Result<Option<learning_entities::Model>> {
    let course = learning_entities::Entity::find()
        .filter(learning_entities::Column::EntityType.eq(ENTITY_TYPE_COURSE))
        .filter(learning_entities::Column::Slug.eq(slug))
        .one(db)
        .await?;

    Ok(course)
}

pub async fn update(
    db: &DatabaseConnection,
    instructor_id: i64,
    course_id: i64,
    fields: CourseFields,
) -> anyhow::Result<learning_entities::Model> {
    let course = find_owned(db, course_id, instructor_id).await?;

    let mut active: learning_entities::ActiveModel = course.into();
    active.title = Set(fields.title);
    active.description = Set(fields.description);
    active.category = Set(fields.category);
    active.level = Set(fields.level);
    if let Some(slug) = fields.slug
        && !slug.is_empty()
    {
        active.slug = Set(slug);
    }
    active.gmt_modified = Set(now_timestamp());

    Ok(active.update(db).await?)
}

pub async fn set_thumbnail(
    db: &DatabaseConnection,
    instructor_id: i64,
    course_id: i64,
    path: &str,
) -> anyhow::Result<()> {
    let course = find_owned(db, course_id, instructor_id).await?;

    let mut active: learning_entities::ActiveModel = course.into();
    active.thumbnail_path = Set(Some(path.to_string()));
    active.gmt_modified = Set(now_timestamp());
    active.update(db).await?;

    Ok(())
}

/// Move a draft or rejected course into the moderation queue.
pub async fn submit_for_review(
    db: &DatabaseConnection,
    instructor_id: i64,
    course_id: i64,
) -> anyhow::Result<()> {
    let course = find_owned(db, course_id, instructor_id).await?;

    let status: EntityStatus = course
        .status
        .parse()
        .map_err(MasarError::InternalError)?;
    if !matches!(status, EntityStatus::Draft | EntityStatus::Rejected) {
        return Err(MasarError::InvalidCourseState(course_id).into());
    }

    set_status(db, course, EntityStatus::Pending).await
}

/// Moderation: PENDING -> PUBLISHED
pub async fn approve(db: &DatabaseConnection, course_id: i64) -> anyhow::Result<learning_entities::Model> {
    transition(db, course_id, EntityStatus::Pending, EntityStatus::Published).await
}

/// Moderation: PENDING -> REJECTED
pub async fn reject(db: &DatabaseConnection, course_id: i64) -> anyhow::Result<learning_entities::Model> {
    transition(db, course_id, EntityStatus::Pending, EntityStatus::Rejected).await
}

/// Moderation: PUBLISHED -> ARCHIVED
pub async fn archive(db: &DatabaseConnection, course_id: i64) -> anyhow::Result<learning_entities::Model> {
    transition(db, course_id, EntityStatus::Published, EntityStatus::Archived).await
}

async fn transition(
    db: &DatabaseConnection,
    course_id: i64,
    from: EntityStatus,
    to: EntityStatus,
) -> anyhow::Result<learning_entities::Model> {
    let course = find_by_id(db, course_id)
        .await?
        .ok_or(MasarError::CourseNotExist(course_id))?;

    if course.status != from.to_string() {
        return Err(MasarError::InvalidCourseState(course_id).into());
    }

    let mut active: learning_entities::ActiveModel = course.into();
    active.status = Set(to.to_string());
    active.gmt_modified = Set(now_timestamp());

    let updated = active.update(db).await?;

    tracing::info!(course_id, from = %from, to = %to, "course status changed");

    Ok(updated)
}

async fn set_status(
    db: &DatabaseConnection,
    course: learning_entities::Model,
    to: EntityStatus,
) -> anyhow::Result<()> {
    let course_id = course.id;
    let mut active: learning_entities::ActiveModel = course.into();
    active.status = Set(to.to_string());
    active.gmt_modified = Set(now_timestamp());
    active.update(db).await?;

    tracing::info!(course_id, to = %to, "course status changed");

    Ok(())
}

/// Delete a course and everything under it.
///
/// Refused while the course still has enrollments (the original schema's
/// restrict rule); modules, lessons, contents, resources, progress rows, and
/// track memberships cascade.
pub async fn delete(
    db: &DatabaseConnection,
    instructor_id: i64,
    course_id: i64,
) -> anyhow::Result<()> {
    find_owned(db, course_id, instructor_id).await?;

    let enrollment_count = enrollments::Entity::find()
        .filter(enrollments::Column::EntityId.eq(course_id))
        .select_only()
        .column_as(prelude::Expr::col(Asterisk).count(), "count")
        .into_tuple::<i64>()
        .one(db)
        .await?
        .unwrap_or_default();
    if enrollment_count > 0 {
        return Err(MasarError::CourseHasEnrollments(course_id).into());
    }

    let module_ids: Vec<i64> = modules::Entity::find()
        .filter(modules::Column::CourseId.eq(course_id))
        .select_only()
        .column(modules::Column::Id)
        .into_tuple()
        .all(db)
        .await?;

    let lesson_ids: Vec<i64> = if module_ids.is_empty() {
        vec![]
    } else {
        lessons::Entity::find()
            .filter(lessons::Column::ModuleId.is_in(module_ids.clone()))
            .select_only()
            .column(lessons::Column::Id)
            .into_tuple()
            .all(db)
            .await?
    };

    let txn = db.begin().await?;

    if !lesson_ids.is_empty() {
        lesson_contents::Entity::delete_many()
            .filter(lesson_contents::Column::LessonId.is_in(lesson_ids.clone()))
            .exec(&txn)
            .await?;
        lesson_resources::Entity::delete_many()
            .filter(lesson_resources::Column::LessonId.is_in(lesson_ids.clone()))
            .exec(&txn)
            .await?;
        lesson_progress::Entity::delete_many()
            .filter(lesson_progress::Column::LessonId.is_in(lesson_ids.clone()))
            .exec(&txn)
            .await?;
        lessons::Entity::delete_many()
            .filter(lessons::Column::Id.is_in(lesson_ids))
            .exec(&txn)
            .await?;
    }
    if !module_ids.is_empty() {
        modules::Entity::delete_many()
            .filter(modules::Column::Id.is_in(module_ids))
            .exec(&txn)
            .await?;
    }
    track_courses::Entity::delete_many()
        .filter(track_courses::Column::CourseId.eq(course_id))
        .exec(&txn)
        .await?;
    learning_entities::Entity::delete_by_id(course_id)
        .exec(&txn)
        .await?;

    txn.commit().await?;

    tracing::info!(course_id, instructor_id, "course deleted");

    Ok(())
}

pub async fn search_page(
    db: &DatabaseConnection,
    filter: &CourseFilter,
    page_no: u64,
    page_size: u64,
) -> anyhow::Result<Page<CourseSummary>> {
    let total_count = filtered(filter)
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
    let rows = filtered(filter)
        .order_by_desc(learning_entities::Column::GmtCreate)
        .offset(offset)
        .limit(page_size)
        .all(db)
        .await?;

    let summaries = decorate(db, &rows).await?;

    Ok(Page::new(total_count, page_no, page_size, summaries))
}

fn filtered(filter: &CourseFilter) -> Select<learning_entities::Entity> {
    let mut select = learning_entities::Entity::find()
        .filter(learning_entities::Column::EntityType.eq(ENTITY_TYPE_COURSE));

    if !filter.text.is_empty() {
        select = select.filter(
            Condition::any()
                .add(learning_entities::Column::Title.contains(&filter.text))
                .add(learning_entities::Column::Description.contains(&filter.text)),
        );
    }
    if !filter.category.is_empty() {
        select = select.filter(learning_entities::Column::Category.eq(filter.category.as_str()));
    }
    if !filter.level.is_empty() {
        select = select.filter(learning_entities::Column::Level.eq(filter.level.as_str()));
    }
    if !filter.status.is_empty() {
        select = select.filter(learning_entities::Column::Status.eq(filter.status.as_str()));
    }
    if let Some(instructor_id) = filter.instructor_id {
        select = select.filter(learning_entities::Column::InstructorId.eq(instructor_id));
    }

    select
}

/// Fill lesson/duration aggregates and instructor names into course rows.
pub async fn decorate(
    db: &DatabaseConnection,
    rows: &[learning_entities::Model],
) -> anyhow::Result<Vec<CourseSummary>> {
    let course_ids: Vec<i64> = rows.iter().map(|c| c.id).collect();
    let aggregates = aggregates_by_course(db, &course_ids).await?;

    let instructor_ids: Vec<i64> = rows.iter().filter_map(|c| c.instructor_id).collect();
    let names: HashMap<i64, String> = if instructor_ids.is_empty() {
        HashMap::new()
    } else {
        users::Entity::find()
            .filter(users::Column::Id.is_in(instructor_ids))
            .select_only()
            .column(users::Column::Id)
            .column(users::Column::DisplayName)
            .into_tuple::<(i64, String)>()
            .all(db)
            .await?
            .into_iter()
            .collect()
    };

    Ok(rows
        .iter()
        .map(|entity| {
            let mut summary = course_summary(entity);
            if let Some((lesson_count, duration)) = aggregates.get(&entity.id) {
                summary.lesson_count = *lesson_count;
                summary.total_duration_seconds = *duration;
            }
            if let Some(instructor_id) = entity.instructor_id
                && let Some(name) = names.get(&instructor_id)
            {
                summary.instructor_name = name.clone();
            }
            summary
        })
        .collect())
}

/// (lesson_count, total_duration_seconds) per course id.
async fn aggregates_by_course(
    db: &DatabaseConnection,
    course_ids: &[i64],
) -> anyhow::Result<HashMap<i64, (u64, i64)>> {
    if course_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let module_rows: Vec<(i64, i64)> = modules::Entity::find()
        .filter(modules::Column::CourseId.is_in(course_ids.to_vec()))
        .select_only()
        .column(modules::Column::Id)
        .column(modules::Column::CourseId)
        .into_tuple()
        .all(db)
        .await?;

    if module_rows.is_empty() {
        return Ok(HashMap::new());
    }

    let module_to_course: HashMap<i64, i64> = module_rows.into_iter().collect();
    let module_ids: Vec<i64> = module_to_course.keys().copied().collect();

    let lesson_rows: Vec<(i64, i64)> = lessons::Entity::find()
        .filter(lessons::Column::ModuleId.is_in(module_ids))
        .select_only()
        .column(lessons::Column::ModuleId)
        .column(lessons::Column::DurationSeconds)
        .into_tuple()
        .all(db)
        .await?;

    let mut aggregates: HashMap<i64, (u64, i64)> = HashMap::new();
    for (module_id, duration) in lesson_rows {
        if let Some(course_id) = module_to_course.get(&module_id) {
            let entry = aggregates.entry(*course_id).or_default();
            entry.0 += 1;
            entry.1 += duration;
        }
    }

    Ok(aggregates)
}

/// Full course view with its outline, as served by the catalog detail page.
///
/// `include_unpublished` is set for instructor/admin callers; students only
/// see published courses.
pub async fn detail(
    db: &DatabaseConnection,
    course: learning_entities::Model,
    include_unpublished: bool,
) -> anyhow::Result<Option<CourseDetail>> {
    if !include_unpublished && course.status != EntityStatus::Published.to_string() {
        return Ok(None);
    }

    let module_rows = modules::Entity::find()
        .filter(modules::Column::CourseId.eq(course.id))
        .order_by_asc(modules::Column::Position)
        .all(db)
        .await?;

    let module_ids: Vec<i64> = module_rows.iter().map(|m| m.id).collect();
    let lesson_rows = if module_ids.is_empty() {
        vec![]
    } else {
        lessons::Entity::find()
            .filter(lessons::Column::ModuleId.is_in(module_ids))
            .order_by_asc(lessons::Column::Position)
            .all(db)
            .await?
    };

    let summary = decorate(db, std::slice::from_ref(&course))
        .await?
        .into_iter()
        .next()
        .unwrap_or_default();

    Ok(Some(CourseDetail {
        summary,
        modules: build_outline(module_rows, lesson_rows),
    }))
}
