//! Catalog service models

use serde::{Deserialize, Serialize};

use masar_persistence::entity::{learning_entities, lesson_resources, lessons, modules};

use masar_api::catalog::{CourseSummary, LessonOutline, LessonResourceView, ModuleOutline, TrackSummary};

/// Filter set for catalog and instructor course listings.
///
/// Empty string fields are ignored; `status` narrows to one state and
/// `instructor_id` to one author.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseFilter {
    pub text: String,
    pub category: String,
    pub level: String,
    pub status: String,
    pub instructor_id: Option<i64>,
}

/// Base summary from an entity row; lesson/duration aggregates and the
/// instructor name are filled in by the service.
pub fn course_summary(entity: &learning_entities::Model) -> CourseSummary {
    CourseSummary {
        id: entity.id,
        title: entity.title.clone(),
        slug: entity.slug.clone(),
        description: entity.description.clone(),
        category: entity.category.clone(),
        level: entity.level.clone(),
        thumbnail_path: entity.thumbnail_path.clone(),
        status: entity.status.clone(),
        instructor_id: entity.instructor_id.unwrap_or_default(),
        instructor_name: String::new(),
        lesson_count: 0,
        total_duration_seconds: 0,
        create_time: entity.gmt_create.and_utc().timestamp_millis(),
    }
}

pub fn track_summary(entity: &learning_entities::Model, course_count: u64) -> TrackSummary {
    TrackSummary {
        id: entity.id,
        title: entity.title.clone(),
        slug: entity.slug.clone(),
        description: entity.description.clone(),
        category: entity.category.clone(),
        status: entity.status.clone(),
        course_count,
        create_time: entity.gmt_create.and_utc().timestamp_millis(),
    }
}

pub fn resource_view(resource: &lesson_resources::Model) -> LessonResourceView {
    LessonResourceView {
        id: resource.id,
        resource_type: resource.resource_type.clone(),
        title: resource.title.clone(),
        location: resource.location.clone(),
    }
}

/// Group ordered lessons under their ordered modules.
///
/// Both inputs may arrive in any order; the outline is sorted by position.
pub fn build_outline(
    mut module_rows: Vec<modules::Model>,
    lesson_rows: Vec<lessons::Model>,
) -> Vec<ModuleOutline> {
    module_rows.sort_by_key(|m| m.position);

    let mut outline: Vec<ModuleOutline> = module_rows
        .iter()
        .map(|m| ModuleOutline {
            id: m.id,
            title: m.title.clone(),
            position: m.position,
            lessons: vec![],
        })
        .collect();

    let mut sorted_lessons = lesson_rows;
    sorted_lessons.sort_by_key(|l| l.position);

    for lesson in sorted_lessons {
        if let Some(entry) = outline.iter_mut().find(|m| m.id == lesson.module_id) {
            entry.lessons.push(LessonOutline {
                id: lesson.id,
                title: lesson.title.clone(),
                position: lesson.position,
                kind: lesson.kind.clone(),
                duration_seconds: lesson.duration_seconds,
                preview: lesson.preview,
            });
        }
    }

    outline
}

#[cfg(test)]
mod tests {
    use super::*;

    fn module(id: i64, position: i32) -> modules::Model {
        modules::Model {
            id,
            course_id: 1,
            title: format!("module-{id}"),
            position,
            gmt_create: chrono::NaiveDateTime::default(),
        }
    }

    fn lesson(id: i64, module_id: i64, position: i32) -> lessons::Model {
        lessons::Model {
            id,
            module_id,
            title: format!("lesson-{id}"),
            position,
            duration_seconds: 60,
            kind: "VIDEO".to_string(),
            preview: false,
            gmt_create: chrono::NaiveDateTime::default(),
        }
    }

    #[test]
    fn test_build_outline_orders_modules_and_lessons() {
        let outline = build_outline(
            vec![module(2, 2), module(1, 1)],
            vec![lesson(12, 2, 2), lesson(11, 2, 1), lesson(10, 1, 1)],
        );

        assert_eq!(outline.len(), 2);
        assert_eq!(outline[0].id, 1);
        assert_eq!(outline[1].id, 2);
        assert_eq!(
            outline[1].lessons.iter().map(|l| l.id).collect::<Vec<_>>(),
            vec![11, 12]
        );
    }

    #[test]
    fn test_build_outline_drops_orphan_lessons() {
        let outline = build_outline(vec![module(1, 1)], vec![lesson(10, 99, 1)]);
        assert_eq!(outline.len(), 1);
        assert!(outline[0].lessons.is_empty());
    }

    #[test]
    fn test_build_outline_empty() {
        assert!(build_outline(vec![], vec![]).is_empty());
    }
}
