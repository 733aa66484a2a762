//! Lesson service
//!
//! Lessons carry exactly one content row (video or article variant) created
//! in the same transaction, plus any number of resources.

use masar_api::catalog::{LessonContentView, LessonResourceView};
use masar_api::model::{CONTENT_TYPE_ARTICLE, CONTENT_TYPE_VIDEO};
use masar_common::error::MasarError;
use masar_common::now_timestamp;
use masar_persistence::entity::{
    lesson_contents, lesson_progress, lesson_resources, lessons, modules,
};
use masar_persistence::sea_orm::*;

use super::{course, module};
use crate::model::resource_view;

pub struct LessonFields {
    pub title: String,
    pub kind: String,
    pub duration_seconds: i64,
    pub preview: bool,
}

pub struct ContentFields {
    pub content_type: String,
    pub video_url: Option<String>,
    pub playback_provider: Option<String>,
    pub article_body: Option<String>,
}

impl ContentFields {
    /// The variant's required payload must be present.
    fn validate(&self) -> Result<(), MasarError> {
        match self.content_type.as_str() {
            CONTENT_TYPE_VIDEO if self.video_url.is_none() => Err(MasarError::IllegalArgument(
                "video content requires a video url".to_string(),
            )),
            CONTENT_TYPE_ARTICLE if self.article_body.is_none() => Err(MasarError::IllegalArgument(
                "article content requires a body".to_string(),
            )),
            CONTENT_TYPE_VIDEO | CONTENT_TYPE_ARTICLE => Ok(()),
            other => Err(MasarError::IllegalArgument(format!(
                "unknown content type '{}'",
                other
            ))),
        }
    }
}

pub async fn create(
    db: &DatabaseConnection,
    instructor_id: i64,
    module_id: i64,
    fields: LessonFields,
    content: ContentFields,
) -> anyhow::Result<lessons::Model> {
    module::find_owned(db, module_id, instructor_id).await?;
    content.validate()?;

    let max_position: Option<i32> = lessons::Entity::find()
        .filter(lessons::Column::ModuleId.eq(module_id))
        .select_only()
        .column_as(lessons::Column::Position.max(), "max_position")
        .into_tuple()
        .one(db)
        .await?
        .flatten();

    let txn = db.begin().await?;

    let lesson = lessons::ActiveModel {
        id: NotSet,
        module_id: Set(module_id),
        title: Set(fields.title),
        position: Set(max_position.unwrap_or(0) + 1),
        duration_seconds: Set(fields.duration_seconds),
        kind: Set(fields.kind),
        preview: Set(fields.preview),
        gmt_create: Set(now_timestamp()),
    }
    .insert(&txn)
    .await?;

    lesson_contents::ActiveModel {
        id: NotSet,
        lesson_id: Set(lesson.id),
        content_type: Set(content.content_type),
        video_url: Set(content.video_url),
        playback_provider: Set(content.playback_provider),
        article_body: Set(content.article_body),
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    Ok(lesson)
}

/// Fetch a lesson and verify the chain lesson -> module -> course -> owner.
pub async fn find_owned(
    db: &DatabaseConnection,
    lesson_id: i64,
    instructor_id: i64,
) -> anyhow::Result<lessons::Model> {
    let lesson = lessons::Entity::find_by_id(lesson_id)
        .one(db)
        .await?
        .ok_or(MasarError::LessonNotExist(lesson_id))?;

    module::find_owned(db, lesson.module_id, instructor_id).await?;

    Ok(lesson)
}

pub async fn update(
    db: &DatabaseConnection,
    instructor_id: i64,
    lesson_id: i64,
    fields: LessonFields,
) -> anyhow::Result<lessons::Model> {
    let lesson = find_owned(db, lesson_id, instructor_id).await?;

    let mut active: lessons::ActiveModel = lesson.into();
    active.title = Set(fields.title);
    active.kind = Set(fields.kind);
    active.duration_seconds = Set(fields.duration_seconds);
    active.preview = Set(fields.preview);

    Ok(active.update(db).await?)
}

/// Replace (or create) the lesson's content row.
pub async fn set_content(
    db: &DatabaseConnection,
    instructor_id: i64,
    lesson_id: i64,
    content: ContentFields,
) -> anyhow::Result<()> {
    find_owned(db, lesson_id, instructor_id).await?;
    content.validate()?;

    match lesson_contents::Entity::find()
        .filter(lesson_contents::Column::LessonId.eq(lesson_id))
        .one(db)
        .await?
    {
        Some(existing) => {
            let mut active: lesson_contents::ActiveModel = existing.into();
            active.content_type = Set(content.content_type);
            active.video_url = Set(content.video_url);
            active.playback_provider = Set(content.playback_provider);
            active.article_body = Set(content.article_body);
            active.update(db).await?;
        }
        None => {
            lesson_contents::ActiveModel {
                id: NotSet,
                lesson_id: Set(lesson_id),
                content_type: Set(content.content_type),
                video_url: Set(content.video_url),
                playback_provider: Set(content.playback_provider),
                article_body: Set(content.article_body),
            }
            .insert(db)
            .await?;
        }
    }

    Ok(())
}

pub async fn content_view(
    db: &DatabaseConnection,
    lesson_id: i64,
) -> anyhow::Result<Option<LessonContentView>> {
    let content = lesson_contents::Entity::find()
        .filter(lesson_contents::Column::LessonId.eq(lesson_id))
        .one(db)
        .await?
        .map(|c| LessonContentView {
            content_type: c.content_type,
            video_url: c.video_url,
            playback_provider: c.playback_provider,
            article_body: c.article_body,
        });

    Ok(content)
}

pub async fn add_resource(
    db: &DatabaseConnection,
    instructor_id: i64,
    lesson_id: i64,
    resource_type: &str,
    title: &str,
    location: &str,
) -> anyhow::Result<lesson_resources::Model> {
    find_owned(db, lesson_id, instructor_id).await?;

    let resource = lesson_resources::ActiveModel {
        id: NotSet,
        lesson_id: Set(lesson_id),
        resource_type: Set(resource_type.to_string()),
        title: Set(title.to_string()),
        location: Set(location.to_string()),
    }
    .insert(db)
    .await?;

    Ok(resource)
}

pub async fn remove_resource(
    db: &DatabaseConnection,
    instructor_id: i64,
    resource_id: i64,
) -> anyhow::Result<()> {
    let resource = lesson_resources::Entity::find_by_id(resource_id)
        .one(db)
        .await?
        .ok_or(MasarError::IllegalArgument(format!(
            "resource '{}' not exist",
            resource_id
        )))?;

    find_owned(db, resource.lesson_id, instructor_id).await?;

    lesson_resources::Entity::delete_by_id(resource_id)
        .exec(db)
        .await?;

    Ok(())
}

pub async fn resources(
    db: &DatabaseConnection,
    lesson_id: i64,
) -> anyhow::Result<Vec<LessonResourceView>> {
    let rows = lesson_resources::Entity::find()
        .filter(lesson_resources::Column::LessonId.eq(lesson_id))
        .order_by_asc(lesson_resources::Column::Id)
        .all(db)
        .await?;

    Ok(rows.iter().map(resource_view).collect())
}

/// Reorder a module's lessons to the given id sequence.
pub async fn reorder(
    db: &DatabaseConnection,
    instructor_id: i64,
    module_id: i64,
    ordered_ids: &[i64],
) -> anyhow::Result<()> {
    module::find_owned(db, module_id, instructor_id).await?;

    let current_ids: Vec<i64> = lessons::Entity::find()
        .filter(lessons::Column::ModuleId.eq(module_id))
        .select_only()
        .column(lessons::Column::Id)
        .into_tuple()
        .all(db)
        .await?;

    if !module::is_permutation(&current_ids, ordered_ids) {
        return Err(MasarError::IllegalArgument(
            "reorder list must contain each lesson of the module exactly once".to_string(),
        )
        .into());
    }

    let txn = db.begin().await?;

    for (index, lesson_id) in ordered_ids.iter().enumerate() {
        lessons::Entity::update_many()
            .col_expr(
                lessons::Column::Position,
                prelude::Expr::value(-(index as i32 + 1)),
            )
            .filter(lessons::Column::Id.eq(*lesson_id))
            .exec(&txn)
            .await?;
    }
    for (index, lesson_id) in ordered_ids.iter().enumerate() {
        lessons::Entity::update_many()
            .col_expr(
                lessons::Column::Position,
                prelude::Expr::value(index as i32 + 1),
            )
            .filter(lessons::Column::Id.eq(*lesson_id))
            .exec(&txn)
            .await?;
    }

    txn.commit().await?;

    Ok(())
}

/// Delete a lesson with its content, resources, and progress rows, then
/// close the position gap in its module.
pub async fn delete(
    db: &DatabaseConnection,
    instructor_id: i64,
    lesson_id: i64,
) -> anyhow::Result<()> {
    let lesson = find_owned(db, lesson_id, instructor_id).await?;

    let txn = db.begin().await?;

    lesson_contents::Entity::delete_many()
        .filter(lesson_contents::Column::LessonId.eq(lesson_id))
        .exec(&txn)
        .await?;
    lesson_resources::Entity::delete_many()
        .filter(lesson_resources::Column::LessonId.eq(lesson_id))
        .exec(&txn)
        .await?;
    lesson_progress::Entity::delete_many()
        .filter(lesson_progress::Column::LessonId.eq(lesson_id))
        .exec(&txn)
        .await?;
    lessons::Entity::delete_by_id(lesson_id).exec(&txn).await?;

    let remaining: Vec<lessons::Model> = lessons::Entity::find()
        .filter(lessons::Column::ModuleId.eq(lesson.module_id))
        .order_by_asc(lessons::Column::Position)
        .all(&txn)
        .await?;

    for (index, row) in remaining.iter().enumerate() {
        let target = index as i32 + 1;
        if row.position != target {
            lessons::Entity::update_many()
                .col_expr(lessons::Column::Position, prelude::Expr::value(target))
                .filter(lessons::Column::Id.eq(row.id))
                .exec(&txn)
                .await?;
        }
    }

    txn.commit().await?;

    Ok(())
}

/// Resolve the course a lesson belongs to (lesson -> module -> course id).
pub async fn course_id_of(db: &DatabaseConnection, lesson_id: i64) -> anyhow::Result<Option<i64>> {
    let lesson = lessons::Entity::find_by_id(lesson_id).one(db).await?;

    let Some(lesson) = lesson else {
        return Ok(None);
    };

    let module = modules::Entity::find_by_id(lesson.module_id).one(db).await?;

    Ok(module.map(|m| m.course_id))
}

/// Whether a course's content can be opened without enrollment: only
/// preview lessons are.
pub async fn is_preview(db: &DatabaseConnection, lesson_id: i64) -> anyhow::Result<bool> {
    let lesson = lessons::Entity::find_by_id(lesson_id).one(db).await?;

    Ok(lesson.map(|l| l.preview).unwrap_or(false))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn content(content_type: &str, video: Option<&str>, body: Option<&str>) -> ContentFields {
        ContentFields {
            content_type: content_type.to_string(),
            video_url: video.map(str::to_string),
            playback_provider: None,
            article_body: body.map(str::to_string),
        }
    }

    #[test]
    fn test_content_validate_video() {
        assert!(content("VIDEO", Some("https://v/1"), None).validate().is_ok());
        assert!(content("VIDEO", None, None).validate().is_err());
    }

    #[test]
    fn test_content_validate_article() {
        assert!(content("ARTICLE", None, Some("text")).validate().is_ok());
        assert!(content("ARTICLE", None, None).validate().is_err());
    }

    #[test]
    fn test_content_validate_unknown_type() {
        assert!(content("QUIZ", None, None).validate().is_err());
    }
}
