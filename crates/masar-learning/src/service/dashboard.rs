//! Dashboard services
//!
//! Aggregates for the student home and instructor teaching dashboards. All
//! aggregation happens over rows already materialized for the user in
//! question; none of these queries cross tenant boundaries.

use std::collections::{HashMap, HashSet};

use masar_api::Page;
use masar_api::learning::{
    EnrolledStudent, InstructorCourseStat, InstructorDashboard, RecentLesson, StudentDashboard,
};
use masar_api::model::{ENTITY_TYPE_COURSE, EntityStatus};
use masar_persistence::entity::{
    enrollments, learning_entities, lesson_progress, lessons, modules, users,
};
use masar_persistence::sea_orm::sea_query::Asterisk;
use masar_persistence::sea_orm::*;

use masar_catalog::service::course;

use super::certificate;

const RECENT_LESSON_LIMIT: u64 = 5;

pub async fn student_dashboard(
    db: &DatabaseConnection,
    student_id: i64,
) -> anyhow::Result<StudentDashboard> {
    let enrollment_rows = enrollments::Entity::find()
        .filter(enrollments::Column::StudentId.eq(student_id))
        .all(db)
        .await?;

    let active_enrollments = enrollment_rows
        .iter()
        .filter(|e| e.completed_at.is_none())
        .count() as u64;
    let completed_enrollments = enrollment_rows
        .iter()
        .filter(|e| e.completed_at.is_some())
        .count() as u64;

    let course_percentages: Vec<f64> = enrollment_rows
        .iter()
        .filter(|e| e.enrollment_type == ENTITY_TYPE_COURSE)
        .map(|e| e.progress_percentage)
        .collect();
    let average_progress = if course_percentages.is_empty() {
        0.0
    } else {
        course_percentages.iter().sum::<f64>() / course_percentages.len() as f64
    };

    let certificates_earned = certificate::find_by_student(db, student_id).await?.len() as u64;

    Ok(StudentDashboard {
        active_enrollments,
        completed_enrollments,
        certificates_earned,
        average_progress,
        recent_lessons: recent_lessons(db, student_id).await?,
    })
}

/// The student's most recently completed lessons with their course titles.
async fn recent_lessons(
    db: &DatabaseConnection,
    student_id: i64,
) -> anyhow::Result<Vec<RecentLesson>> {
    let progress_rows = lesson_progress::Entity::find()
        .filter(lesson_progress::Column::StudentId.eq(student_id))
        .filter(lesson_progress::Column::Completed.eq(true))
        .order_by_desc(lesson_progress::Column::CompletedAt)
        .limit(RECENT_LESSON_LIMIT)
        .all(db)
        .await?;

    if progress_rows.is_empty() {
        return Ok(vec![]);
    }

    let lesson_ids: Vec<i64> = progress_rows.iter().map(|p| p.lesson_id).collect();
    let lesson_rows: HashMap<i64, lessons::Model> = lessons::Entity::find()
        .filter(lessons::Column::Id.is_in(lesson_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|l| (l.id, l))
        .collect();

    let module_ids: Vec<i64> = lesson_rows.values().map(|l| l.module_id).collect();
    let module_rows: HashMap<i64, modules::Model> = modules::Entity::find()
        .filter(modules::Column::Id.is_in(module_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|m| (m.id, m))
        .collect();

    let course_ids: Vec<i64> = module_rows.values().map(|m| m.course_id).collect();
    let course_titles: HashMap<i64, String> = learning_entities::Entity::find()
        .filter(learning_entities::Column::Id.is_in(course_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|e| (e.id, e.title))
        .collect();

    let recent = progress_rows
        .iter()
        .filter_map(|p| {
            let lesson = lesson_rows.get(&p.lesson_id)?;
            let module = module_rows.get(&lesson.module_id)?;
            Some(RecentLesson {
                lesson_id: lesson.id,
                lesson_title: lesson.title.clone(),
                course_id: module.course_id,
                course_title: course_titles.get(&module.course_id).cloned().unwrap_or_default(),
                completed_at: p
                    .completed_at
                    .map(|t| t.and_utc().timestamp_millis())
                    .unwrap_or_default(),
            })
        })
        .collect();

    Ok(recent)
}

pub async fn instructor_dashboard(
    db: &DatabaseConnection,
    instructor_id: i64,
) -> anyhow::Result<InstructorDashboard> {
    let course_rows = learning_entities::Entity::find()
        .filter(learning_entities::Column::EntityType.eq(ENTITY_TYPE_COURSE))
        .filter(learning_entities::Column::InstructorId.eq(instructor_id))
        .order_by_desc(learning_entities::Column::GmtCreate)
        .all(db)
        .await?;

    let total_courses = course_rows.len() as u64;
    let count_status = |status: EntityStatus| {
        course_rows
            .iter()
            .filter(|c| c.status == status.to_string())
            .count() as u64
    };

    let course_ids: Vec<i64> = course_rows.iter().map(|c| c.id).collect();
    let enrollment_rows = if course_ids.is_empty() {
        vec![]
    } else {
        enrollments::Entity::find()
            .filter(enrollments::Column::EntityId.is_in(course_ids))
            .all(db)
            .await?
    };

    let total_students = enrollment_rows
        .iter()
        .map(|e| e.student_id)
        .collect::<HashSet<i64>>()
        .len() as u64;

    let average_progress = if enrollment_rows.is_empty() {
        0.0
    } else {
        enrollment_rows
            .iter()
            .map(|e| e.progress_percentage)
            .sum::<f64>()
            / enrollment_rows.len() as f64
    };

    let mut per_course: HashMap<i64, (u64, f64)> = HashMap::new();
    for row in &enrollment_rows {
        let entry = per_course.entry(row.entity_id).or_default();
        entry.0 += 1;
        entry.1 += row.progress_percentage;
    }

    let courses = course_rows
        .iter()
        .map(|c| {
            let (enrollment_count, progress_sum) =
                per_course.get(&c.id).copied().unwrap_or((0, 0.0));
            InstructorCourseStat {
                course_id: c.id,
                title: c.title.clone(),
                status: c.status.clone(),
                enrollment_count,
                average_progress: if enrollment_count > 0 {
                    progress_sum / enrollment_count as f64
                } else {
                    0.0
                },
            }
        })
        .collect();

    Ok(InstructorDashboard {
        total_courses,
        published_courses: count_status(EntityStatus::Published),
        draft_courses: count_status(EntityStatus::Draft),
        pending_courses: count_status(EntityStatus::Pending),
        total_students,
        average_progress,
        courses,
    })
}

/// Paged enrolled-student roster for one of the instructor's courses.
pub async fn course_students_page(
    db: &DatabaseConnection,
    instructor_id: i64,
    course_id: i64,
    page_no: u64,
    page_size: u64,
) -> anyhow::Result<Page<EnrolledStudent>> {
    course::find_owned(db, course_id, instructor_id).await?;

    let total_count = enrollments::Entity::find()
        .filter(enrollments::Column::EntityId.eq(course_id))
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
        .filter(enrollments::Column::EntityId.eq(course_id))
        .order_by_desc(enrollments::Column::EnrolledAt)
        .offset(offset)
        .limit(page_size)
        .all(db)
        .await?;

    let student_ids: Vec<i64> = rows.iter().map(|e| e.student_id).collect();
    let user_rows: HashMap<i64, users::Model> = users::Entity::find()
        .filter(users::Column::Id.is_in(student_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|u| (u.id, u))
        .collect();

    let page_items = rows
        .iter()
        .map(|row| {
            let user = user_rows.get(&row.student_id);
            EnrolledStudent {
                student_id: row.student_id,
                username: user.map(|u| u.username.clone()).unwrap_or_default(),
                display_name: user.map(|u| u.display_name.clone()).unwrap_or_default(),
                progress_percentage: row.progress_percentage,
                enrolled_at: row.enrolled_at.and_utc().timestamp_millis(),
                completed_at: row.completed_at.map(|t| t.and_utc().timestamp_millis()),
            }
        })
        .collect();

    Ok(Page::new(total_count, page_no, page_size, page_items))
}
