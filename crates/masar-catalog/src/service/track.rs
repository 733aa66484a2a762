//! Track service
//!
//! Tracks are admin-curated ordered sequences of published courses, stored
//! as learning entities with TRACK as the discriminator.

use masar_api::Page;
use masar_api::catalog::{TrackCourseEntry, TrackDetail, TrackSummary};
use masar_api::model::{ENTITY_TYPE_TRACK, EntityStatus};
use masar_common::error::MasarError;
use masar_common::{now_timestamp, slugify};
use masar_persistence::entity::{learning_entities, track_courses};
use masar_persistence::sea_orm::sea_query::Asterisk;
use masar_persistence::sea_orm::*;

use super::course;
use crate::model::track_summary;

pub struct TrackFields {
    pub title: String,
    pub slug: Option<String>,
    pub description: String,
    pub category: String,
}

pub async fn create(
    db: &DatabaseConnection,
    fields: TrackFields,
) -> anyhow::Result<learning_entities::Model> {
    let slug = match fields.slug {
        Some(s) if !s.is_empty() => s,
        _ => slugify(&fields.title),
    };

    if slug.is_empty() {
        return Err(MasarError::IllegalArgument("track slug cannot be empty".to_string()).into());
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
        entity_type: Set(ENTITY_TYPE_TRACK.to_string()),
        title: Set(fields.title),
        slug: Set(slug),
        description: Set(fields.description),
        category: Set(fields.category),
        level: Set(String::new()),
        thumbnail_path: Set(None),
        instructor_id: Set(None),
        status: Set(EntityStatus::Draft.to_string()),
        gmt_create: Set(now),
        gmt_modified: Set(now),
    };

    Ok(entity.insert(db).await?)
}

pub async fn find_by_id(
    db: &DatabaseConnection,
    track_id: i64,
) -> anyhow::Result<Option<learning_entities::Model>> {
    let track = learning_entities::Entity::find_by_id(track_id)
        .filter(learning_entities::Column::EntityType.eq(ENTITY_TYPE_TRACK))
        .one(db)
        .await?;

    Ok(track)
}

/// Publish a draft track; only published tracks are enrollable.
pub async fn publish(db: &DatabaseConnection, track_id: i64) -> anyhow::Result<()> {
    let track = find_by_id(db, track_id)
        .await?
        .ok_or(MasarError::TrackNotExist(track_id))?;

    let mut active: learning_entities::ActiveModel = track.into();
    active.status = Set(EntityStatus::Published.to_string());
    active.gmt_modified = Set(now_timestamp());
    active.update(db).await?;

    Ok(())
}

/// Append a published course to the end of a track.
pub async fn add_course(
    db: &DatabaseConnection,
    track_id: i64,
    course_id: i64,
) -> anyhow::Result<track_courses::Model> {
    find_by_id(db, track_id)
        .await?
        .ok_or(MasarError::TrackNotExist(track_id))?;
    course::find_by_id(db, course_id)
        .await?
        .ok_or(MasarError::CourseNotExist(course_id))?;

    let already_member = track_courses::Entity::find()
        .filter(track_courses::Column::TrackId.eq(track_id))
        .filter(track_courses::Column::CourseId.eq(course_id))
        .one(db)
        .await?
        .is_some();
    if already_member {
        return Err(MasarError::IllegalArgument(format!(
            "course '{}' already part of track '{}'",
            course_id, track_id
        ))
        .into());
    }

    let max_position: Option<i32> = track_courses::Entity::find()
        .filter(track_courses::Column::TrackId.eq(track_id))
        .select_only()
        .column_as(track_courses::Column::Position.max(), "max_position")
        .into_tuple()
        .one(db)
        .await?
        .flatten();

    let entity = track_courses::ActiveModel {
        id: NotSet,
        track_id: Set(track_id),
        course_id: Set(course_id),
        position: Set(max_position.unwrap_or(0) + 1),
    };

    Ok(entity.insert(db).await?)
}

/// Remove a course from a track and close the position gap.
pub async fn remove_course(
    db: &DatabaseConnection,
    track_id: i64,
    course_id: i64,
) -> anyhow::Result<()> {
    let txn = db.begin().await?;

    track_courses::Entity::delete_many()
        .filter(track_courses::Column::TrackId.eq(track_id))
        .filter(track_courses::Column::CourseId.eq(course_id))
        .exec(&txn)
        .await?;

    let remaining: Vec<track_courses::Model> = track_courses::Entity::find()
        .filter(track_courses::Column::TrackId.eq(track_id))
        .order_by_asc(track_courses::Column::Position)
        .all(&txn)
        .await?;

    for (index, row) in remaining.iter().enumerate() {
        let target = index as i32 + 1;
        if row.position != target {
            track_courses::Entity::update_many()
                .col_expr(track_courses::Column::Position, prelude::Expr::value(target))
                .filter(track_courses::Column::Id.eq(row.id))
                .exec(&txn)
                .await?;
        }
    }

    txn.commit().await?;

    Ok(())
}

/// Ordered course ids of a track.
pub async fn member_course_ids(
    db: &DatabaseConnection,
    track_id: i64,
) -> anyhow::Result<Vec<i64>> {
    let ids = track_courses::Entity::find()
        .filter(track_courses::Column::TrackId.eq(track_id))
        .order_by_asc(track_courses::Column::Position)
        .select_only()
        .column(track_courses::Column::CourseId)
        .into_tuple()
        .all(db)
        .await?;

    Ok(ids)
}

pub async fn search_page(
    db: &DatabaseConnection,
    text: &str,
    published_only: bool,
    page_no: u64,
    page_size: u64,
) -> anyhow::Result<Page<TrackSummary>> {
    let total_count = filtered(text, published_only)
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
    let rows = filtered(text, published_only)
        .order_by_desc(learning_entities::Column::GmtCreate)
        .offset(offset)
        .limit(page_size)
        .all(db)
        .await?;

    let mut summaries = Vec::with_capacity(rows.len());
    for row in &rows {
        let course_count = track_courses::Entity::find()
            .filter(track_courses::Column::TrackId.eq(row.id))
            .select_only()
            .column_as(prelude::Expr::col(Asterisk).count(), "count")
            .into_tuple::<i64>()
            .one(db)
            .await?
            .unwrap_or_default() as u64;
        summaries.push(track_summary(row, course_count));
    }

    Ok(Page::new(total_count, page_no, page_size, summaries))
}

fn filtered(text: &str, published_only: bool) -> Select<learning_entities::Entity> {
    let mut select = learning_entities::Entity::find()
        .filter(learning_entities::Column::EntityType.eq(ENTITY_TYPE_TRACK));

    if !text.is_empty() {
        select = select.filter(
            Condition::any()
                .add(learning_entities::Column::Title.contains(text))
                .add(learning_entities::Column::Description.contains(text)),
        );
    }
    if published_only {
        select = select
            .filter(learning_entities::Column::Status.eq(EntityStatus::Published.to_string()));
    }

    select
}

/// Full track view with its ordered member courses.
pub async fn detail(
    db: &DatabaseConnection,
    track_id: i64,
) -> anyhow::Result<Option<TrackDetail>> {
    let Some(track) = find_by_id(db, track_id).await? else {
        return Ok(None);
    };

    let memberships = track_courses::Entity::find()
        .filter(track_courses::Column::TrackId.eq(track_id))
        .order_by_asc(track_courses::Column::Position)
        .all(db)
        .await?;

    let course_ids: Vec<i64> = memberships.iter().map(|m| m.course_id).collect();
    let course_rows = if course_ids.is_empty() {
        vec![]
    } else {
        learning_entities::Entity::find()
            .filter(learning_entities::Column::Id.is_in(course_ids))
            .all(db)
            .await?
    };

    let summaries = course::decorate(db, &course_rows).await?;

    let courses = memberships
        .iter()
        .filter_map(|m| {
            summaries
                .iter()
                .find(|s| s.id == m.course_id)
                .map(|s| TrackCourseEntry {
                    position: m.position,
                    course: s.clone(),
                })
        })
        .collect();

    Ok(Some(TrackDetail {
        summary: track_summary(&track, memberships.len() as u64),
        courses,
    }))
}
