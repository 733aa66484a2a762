//! Module service
//!
//! Positions inside a course are unique and contiguous from 1; reorder and
//! delete renumber in two passes (negative then final) so the unique index
//! never sees a duplicate mid-update.

use masar_common::error::MasarError;
use masar_common::now_timestamp;
use masar_persistence::entity::{
    lesson_contents, lesson_progress, lesson_resources, lessons, modules,
};
use masar_persistence::sea_orm::*;

use super::course;

pub async fn create(
    db: &DatabaseConnection,
    instructor_id: i64,
    course_id: i64,
    title: &str,
) -> anyhow::Result<modules::Model> {
    course::find_owned(db, course_id, instructor_id).await?;

    let max_position: Option<i32> = modules::Entity::find()
        .filter(modules::Column::CourseId.eq(course_id))
        .select_only()
        .column_as(modules::Column::Position.max(), "max_position")
        .into_tuple()
        .one(db)
        .await?
        .flatten();

    let entity = modules::ActiveModel {
        id: NotSet,
        course_id: Set(course_id),
        title: Set(title.to_string()),
        position: Set(max_position.unwrap_or(0) + 1),
        gmt_create: Set(now_timestamp()),
    };

    Ok(entity.insert(db).await?)
}

pub async fn find_owned(
    db: &DatabaseConnection,
    module_id: i64,
    instructor_id: i64,
) -> anyhow::Result<modules::Model> {
    let module = modules::Entity::find_by_id(module_id)
        .one(db)
        .await?
        .ok_or(MasarError::ModuleNotExist(module_id))?;

    course::find_owned(db, module.course_id, instructor_id).await?;

    Ok(module)
}

pub async fn rename(
    db: &DatabaseConnection,
    instructor_id: i64,
    module_id: i64,
    title: &str,
) -> anyhow::Result<modules::Model> {
    let module = find_owned(db, module_id, instructor_id).await?;

    let mut active: modules::ActiveModel = module.into();
    active.title = Set(title.to_string());

    Ok(active.update(db).await?)
}

/// Reorder a course's modules to the given id sequence.
///
/// The sequence must be a permutation of the course's current module ids.
pub async fn reorder(
    db: &DatabaseConnection,
    instructor_id: i64,
    course_id: i64,
    ordered_ids: &[i64],
) -> anyhow::Result<()> {
    course::find_owned(db, course_id, instructor_id).await?;

    let current_ids: Vec<i64> = modules::Entity::find()
        .filter(modules::Column::CourseId.eq(course_id))
        .select_only()
        .column(modules::Column::Id)
        .into_tuple()
        .all(db)
        .await?;

    if !is_permutation(&current_ids, ordered_ids) {
        return Err(MasarError::IllegalArgument(
            "reorder list must contain each module of the course exactly once".to_string(),
        )
        .into());
    }

    let txn = db.begin().await?;

    // First pass parks every row on a negative position to clear the way.
    for (index, module_id) in ordered_ids.iter().enumerate() {
        modules::Entity::update_many()
            .col_expr(
                modules::Column::Position,
                prelude::Expr::value(-(index as i32 + 1)),
            )
            .filter(modules::Column::Id.eq(*module_id))
            .exec(&txn)
            .await?;
    }
    for (index, module_id) in ordered_ids.iter().enumerate() {
        modules::Entity::update_many()
            .col_expr(
                modules::Column::Position,
                prelude::Expr::value(index as i32 + 1),
            )
            .filter(modules::Column::Id.eq(*module_id))
            .exec(&txn)
            .await?;
    }

    txn.commit().await?;

    Ok(())
}

/// Delete a module and its lessons, then close the position gap.
pub async fn delete(
    db: &DatabaseConnection,
    instructor_id: i64,
    module_id: i64,
) -> anyhow::Result<()> {
    let module = find_owned(db, module_id, instructor_id).await?;

    let lesson_ids: Vec<i64> = lessons::Entity::find()
        .filter(lessons::Column::ModuleId.eq(module_id))
        .select_only()
        .column(lessons::Column::Id)
        .into_tuple()
        .all(db)
        .await?;

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

    modules::Entity::delete_by_id(module_id).exec(&txn).await?;

    // Close the gap left behind so positions stay contiguous.
    let remaining: Vec<modules::Model> = modules::Entity::find()
        .filter(modules::Column::CourseId.eq(module.course_id))
        .order_by_asc(modules::Column::Position)
        .all(&txn)
        .await?;

    for (index, row) in remaining.iter().enumerate() {
        let target = index as i32 + 1;
        if row.position != target {
            modules::Entity::update_many()
                .col_expr(modules::Column::Position, prelude::Expr::value(target))
                .filter(modules::Column::Id.eq(row.id))
                .exec(&txn)
                .await?;
        }
    }

    txn.commit().await?;

    Ok(())
}

/// Whether `candidate` contains exactly the elements of `current`.
pub(crate) fn is_permutation(current: &[i64], candidate: &[i64]) -> bool {
    if current.len() != candidate.len() {
        return false;
    }

    let mut a = current.to_vec();
    let mut b = candidate.to_vec();
    a.sort_unstable();
    b.sort_unstable();

    a == b
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_permutation() {
        assert!(is_permutation(&[1, 2, 3], &[3, 1, 2]));
        assert!(is_permutation(&[], &[]));
        assert!(!is_permutation(&[1, 2], &[1, 2, 3]));
        assert!(!is_permutation(&[1, 2, 3], &[1, 1, 3]));
    }
}
