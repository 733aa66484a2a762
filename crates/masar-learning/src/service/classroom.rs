//! Classroom service
//!
//! Builds the classroom payload (course stats, per-module completion flags,
//! one active lesson with content) and applies lesson completion toggles,
//! recomputing the denormalized enrollment percentage each time.

use std::collections::{HashMap, HashSet};

use masar_api::learning::{
    ActiveLesson, ClassroomCourse, ClassroomLesson, ClassroomModule, ClassroomView,
    ProgressUpdateResult,
};
use masar_api::model::{ENTITY_TYPE_COURSE, ENTITY_TYPE_TRACK};
use masar_common::error::MasarError;
use masar_common::now_timestamp;
use masar_persistence::entity::{enrollments, lesson_progress, lessons, modules, track_courses};
use masar_persistence::sea_orm::*;

use masar_catalog::service::{course, lesson};

use crate::model::{CourseProgress, LessonProgressEntry, resolve_active_lesson, track_percentage};

use super::{certificate, enrollment};

/// Assemble the classroom for one student and course.
///
/// Returns `None` when the student is not enrolled; the controller turns
/// that into a 403 the same way the original returned the student to the
/// course page.
pub async fn classroom(
    db: &DatabaseConnection,
    student_id: i64,
    course_id: i64,
    requested_lesson: Option<i64>,
) -> anyhow::Result<Option<ClassroomView>> {
    if enrollment::find(db, student_id, course_id).await?.is_none() {
        return Ok(None);
    }

    let course_row = course::find_by_id(db, course_id)
        .await?
        .ok_or(MasarError::CourseNotExist(course_id))?;

    let (module_rows, lesson_rows, completed_ids) =
        materialize(db, course_id, student_id).await?;

    let entries = to_entries(&module_rows, &lesson_rows, &completed_ids);
    let progress = CourseProgress::compute(&entries);
    let active_id = resolve_active_lesson(&entries, requested_lesson);

    let mut view_modules: Vec<ClassroomModule> = module_rows
        .iter()
        .map(|m| ClassroomModule {
            id: m.id,
            title: m.title.clone(),
            position: m.position,
            lessons: vec![],
        })
        .collect();

    for row in &lesson_rows {
        if let Some(entry) = view_modules.iter_mut().find(|m| m.id == row.module_id) {
            entry.lessons.push(ClassroomLesson {
                id: row.id,
                title: row.title.clone(),
                position: row.position,
                kind: row.kind.clone(),
                duration_seconds: row.duration_seconds,
                completed: completed_ids.contains(&row.id),
            });
        }
    }

    let active_lesson = match active_id {
        Some(id) => {
            let row = lesson_rows
                .iter()
                .find(|l| l.id == id)
                .ok_or(MasarError::LessonNotExist(id))?;
            Some(ActiveLesson {
                id: row.id,
                module_id: row.module_id,
                title: row.title.clone(),
                kind: row.kind.clone(),
                duration_seconds: row.duration_seconds,
                completed: completed_ids.contains(&row.id),
                content: lesson::content_view(db, row.id).await?,
                resources: lesson::resources(db, row.id).await?,
            })
        }
        None => None,
    };

    Ok(Some(ClassroomView {
        course: ClassroomCourse {
            id: course_row.id,
            title: course_row.title,
            slug: course_row.slug,
            total_lessons: progress.total_lessons,
            completed_lessons: progress.completed_lessons,
            total_duration_seconds: progress.total_duration_seconds,
            completed_duration_seconds: progress.completed_duration_seconds,
            progress_percentage: progress.percentage,
        },
        modules: view_modules,
        active_lesson,
    }))
}

/// Toggle a lesson's completion for a student and recompute course (and any
/// containing track) progress.
pub async fn update_lesson_completion(
    db: &DatabaseConnection,
    student_id: i64,
    lesson_id: i64,
    completed: bool,
) -> anyhow::Result<ProgressUpdateResult> {
    let course_id = lesson::course_id_of(db, lesson_id)
        .await?
        .ok_or(MasarError::LessonNotExist(lesson_id))?;

    let enrollment_row = enrollment::find(db, student_id, course_id)
        .await?
        .ok_or(MasarError::NotEnrolled(student_id, course_id))?;

    upsert_progress_row(db, student_id, lesson_id, completed).await?;

    let (module_rows, lesson_rows, completed_ids) =
        materialize(db, course_id, student_id).await?;
    let entries = to_entries(&module_rows, &lesson_rows, &completed_ids);
    let progress = CourseProgress::compute(&entries);

    let course_completed = progress.is_complete();

    let mut active: enrollments::ActiveModel = enrollment_row.into();
    active.progress_percentage = Set(progress.percentage);
    active.completed_at = Set(if course_completed {
        Some(now_timestamp())
    } else {
        None
    });
    active.update(db).await?;

    let certificate_serial = if course_completed {
        certificate::issue_if_absent(db, student_id, course_id, ENTITY_TYPE_COURSE)
            .await?
            .map(|c| c.serial_number)
    } else {
        None
    };

    refresh_track_progress(db, student_id, course_id).await?;

    tracing::debug!(
        student_id,
        lesson_id,
        course_id,
        completed,
        percentage = progress.percentage,
        "lesson completion updated"
    );

    Ok(ProgressUpdateResult {
        lesson_id,
        completed,
        course_id,
        progress_percentage: progress.percentage,
        course_completed,
        certificate_serial,
    })
}

async fn upsert_progress_row(
    db: &DatabaseConnection,
    student_id: i64,
    lesson_id: i64,
    completed: bool,
) -> anyhow::Result<()> {
    let existing = lesson_progress::Entity::find()
        .filter(lesson_progress::Column::StudentId.eq(student_id))
        .filter(lesson_progress::Column::LessonId.eq(lesson_id))
        .one(db)
        .await?;

    let completed_at = completed.then(now_timestamp);

    match existing {
        Some(row) => {
            let mut active: lesson_progress::ActiveModel = row.into();
            active.completed = Set(completed);
            active.completed_at = Set(completed_at);
            active.update(db).await?;
        }
        None => {
            lesson_progress::ActiveModel {
                id: NotSet,
                student_id: Set(student_id),
                lesson_id: Set(lesson_id),
                completed: Set(completed),
                completed_at: Set(completed_at),
            }
            .insert(db)
            .await?;
        }
    }

    Ok(())
}

/// Fetch a course's ordered modules and lessons plus the student's set of
/// completed lesson ids.
async fn materialize(
    db: &DatabaseConnection,
    course_id: i64,
    student_id: i64,
) -> anyhow::Result<(Vec<modules::Model>, Vec<lessons::Model>, HashSet<i64>)> {
    let module_rows = modules::Entity::find()
        .filter(modules::Column::CourseId.eq(course_id))
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

    let lesson_ids: Vec<i64> = lesson_rows.iter().map(|l| l.id).collect();
    let completed_ids: HashSet<i64> = if lesson_ids.is_empty() {
        HashSet::new()
    } else {
        lesson_progress::Entity::find()
            .filter(lesson_progress::Column::StudentId.eq(student_id))
            .filter(lesson_progress::Column::LessonId.is_in(lesson_ids))
            .filter(lesson_progress::Column::Completed.eq(true))
            .select_only()
            .column(lesson_progress::Column::LessonId)
            .into_tuple::<i64>()
            .all(db)
            .await?
            .into_iter()
            .collect()
    };

    Ok((module_rows, lesson_rows, completed_ids))
}

fn to_entries(
    module_rows: &[modules::Model],
    lesson_rows: &[lessons::Model],
    completed_ids: &HashSet<i64>,
) -> Vec<LessonProgressEntry> {
    let module_positions: HashMap<i64, i32> =
        module_rows.iter().map(|m| (m.id, m.position)).collect();

    lesson_rows
        .iter()
        .map(|l| LessonProgressEntry {
            lesson_id: l.id,
            order: (
                module_positions.get(&l.module_id).copied().unwrap_or(i32::MAX),
                l.position,
            ),
            duration_seconds: l.duration_seconds,
            completed: completed_ids.contains(&l.id),
        })
        .collect()
}

/// Recompute the percentage of every track the student is enrolled in that
/// contains the given course, issuing track certificates on completion.
async fn refresh_track_progress(
    db: &DatabaseConnection,
    student_id: i64,
    course_id: i64,
) -> anyhow::Result<()> {
    let track_ids: Vec<i64> = track_courses::Entity::find()
        .filter(track_courses::Column::CourseId.eq(course_id))
        .select_only()
        .column(track_courses::Column::TrackId)
        .into_tuple()
        .all(db)
        .await?;

    for track_id in track_ids {
        let Some(track_enrollment) = enrollment::find(db, student_id, track_id).await? else {
            continue;
        };

        let member_ids: Vec<i64> = track_courses::Entity::find()
            .filter(track_courses::Column::TrackId.eq(track_id))
            .select_only()
            .column(track_courses::Column::CourseId)
            .into_tuple()
            .all(db)
            .await?;

        let course_enrollments: HashMap<i64, f64> = if member_ids.is_empty() {
            HashMap::new()
        } else {
            enrollments::Entity::find()
                .filter(enrollments::Column::StudentId.eq(student_id))
                .filter(enrollments::Column::EntityId.is_in(member_ids.clone()))
                .all(db)
                .await?
                .into_iter()
                .map(|e| (e.entity_id, e.progress_percentage))
                .collect()
        };

        // Member courses the student never opened count as 0%.
        let percentages: Vec<f64> = member_ids
            .iter()
            .map(|id| course_enrollments.get(id).copied().unwrap_or(0.0))
            .collect();

        let percentage = track_percentage(&percentages);
        let track_completed = !percentages.is_empty() && percentage >= 100.0;

        let mut active: enrollments::ActiveModel = track_enrollment.into();
        active.progress_percentage = Set(percentage);
        active.completed_at = Set(track_completed.then(now_timestamp));
        active.update(db).await?;

        if track_completed {
            certificate::issue_if_absent(db, student_id, track_id, ENTITY_TYPE_TRACK).await?;
        }
    }

    Ok(())
}
