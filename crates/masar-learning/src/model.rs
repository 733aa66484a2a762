//! Progress computation
//!
//! The pure core of the learning engine: given a course's lessons and a
//! student's completion flags, compute the duration-weighted completion
//! percentage and resolve which lesson the classroom should open.
//!
//! Kept free of database types so the arithmetic is testable in isolation;
//! the classroom service feeds it rows it has already materialized.

use serde::{Deserialize, Serialize};

/// One lesson as seen by the progress computation: ordering key,
/// duration weight, and the student's completion flag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LessonProgressEntry {
    pub lesson_id: i64,
    /// (module position, lesson position) — the classroom's display order
    pub order: (i32, i32),
    pub duration_seconds: i64,
    pub completed: bool,
}

/// Aggregated completion stats for one student and course
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseProgress {
    pub total_lessons: u64,
    pub completed_lessons: u64,
    pub total_duration_seconds: i64,
    pub completed_duration_seconds: i64,
    pub percentage: f64,
}

impl CourseProgress {
    /// Duration-weighted completion over the given lessons.
    ///
    /// A course whose total duration is zero reports 0% regardless of
    /// completion flags, keeping the percentage inside [0, 100].
    pub fn compute(lessons: &[LessonProgressEntry]) -> Self {
        let total_lessons = lessons.len() as u64;
        let completed_lessons = lessons.iter().filter(|l| l.completed).count() as u64;
        let total_duration_seconds: i64 = lessons.iter().map(|l| l.duration_seconds).sum();
        let completed_duration_seconds: i64 = lessons
            .iter()
            .filter(|l| l.completed)
            .map(|l| l.duration_seconds)
            .sum();

        let percentage = if total_duration_seconds > 0 {
            (completed_duration_seconds as f64 / total_duration_seconds as f64 * 100.0)
                .clamp(0.0, 100.0)
        } else {
            0.0
        };

        Self {
            total_lessons,
            completed_lessons,
            total_duration_seconds,
            completed_duration_seconds,
            percentage,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.total_lessons > 0 && self.completed_lessons == self.total_lessons
    }
}

/// Pick the lesson the classroom should open.
///
/// An explicitly requested lesson wins when it belongs to the course;
/// otherwise the first incomplete lesson in display order; otherwise the
/// last lesson. `None` only for a course with no lessons.
pub fn resolve_active_lesson(
    lessons: &[LessonProgressEntry],
    requested: Option<i64>,
) -> Option<i64> {
    if let Some(id) = requested
        && lessons.iter().any(|l| l.lesson_id == id)
    {
        return Some(id);
    }

    let mut ordered: Vec<&LessonProgressEntry> = lessons.iter().collect();
    ordered.sort_by_key(|l| l.order);

    ordered
        .iter()
        .find(|l| !l.completed)
        .or_else(|| ordered.last())
        .map(|l| l.lesson_id)
}

/// Track progress is the mean of its member courses' percentages.
///
/// An empty track reports 0%.
pub fn track_percentage(course_percentages: &[f64]) -> f64 {
    if course_percentages.is_empty() {
        return 0.0;
    }

    let sum: f64 = course_percentages.iter().sum();
    (sum / course_percentages.len() as f64).clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: i64, order: (i32, i32), duration: i64, completed: bool) -> LessonProgressEntry {
        LessonProgressEntry {
            lesson_id: id,
            order,
            duration_seconds: duration,
            completed,
        }
    }

    #[test]
    fn test_completed_never_exceeds_total() {
        let lessons = vec![
            entry(1, (1, 1), 60, true),
            entry(2, (1, 2), 120, true),
            entry(3, (2, 1), 30, false),
        ];
        let progress = CourseProgress::compute(&lessons);
        assert!(progress.completed_lessons <= progress.total_lessons);
        assert_eq!(progress.total_lessons, 3);
        assert_eq!(progress.completed_lessons, 2);
    }

    #[test]
    fn test_percentage_is_duration_weighted() {
        let lessons = vec![
            entry(1, (1, 1), 300, true),
            entry(2, (1, 2), 100, false),
        ];
        let progress = CourseProgress::compute(&lessons);
        assert_eq!(progress.percentage, 75.0);
        assert_eq!(progress.completed_duration_seconds, 300);
        assert_eq!(progress.total_duration_seconds, 400);
    }

    #[test]
    fn test_percentage_bounds() {
        let none = CourseProgress::compute(&[entry(1, (1, 1), 60, false)]);
        assert_eq!(none.percentage, 0.0);

        let all = CourseProgress::compute(&[entry(1, (1, 1), 60, true)]);
        assert_eq!(all.percentage, 100.0);
    }

    #[test]
    fn test_zero_duration_course_reports_zero() {
        let lessons = vec![entry(1, (1, 1), 0, true), entry(2, (1, 2), 0, true)];
        let progress = CourseProgress::compute(&lessons);
        assert_eq!(progress.percentage, 0.0);
        assert!((0.0..=100.0).contains(&progress.percentage));
    }

    #[test]
    fn test_empty_course() {
        let progress = CourseProgress::compute(&[]);
        assert_eq!(progress.total_lessons, 0);
        assert_eq!(progress.percentage, 0.0);
        assert!(!progress.is_complete());
    }

    #[test]
    fn test_complete_then_uncomplete_restores_percentage() {
        let before = vec![entry(1, (1, 1), 60, true), entry(2, (1, 2), 90, false)];
        let prior = CourseProgress::compute(&before).percentage;

        let mut toggled = before.clone();
        toggled[1].completed = true;
        let _ = CourseProgress::compute(&toggled);

        toggled[1].completed = false;
        let restored = CourseProgress::compute(&toggled).percentage;
        assert_eq!(prior, restored);
    }

    #[test]
    fn test_is_complete() {
        let done = CourseProgress::compute(&[entry(1, (1, 1), 10, true)]);
        assert!(done.is_complete());

        let not_done = CourseProgress::compute(&[entry(1, (1, 1), 10, false)]);
        assert!(!not_done.is_complete());
    }

    #[test]
    fn test_active_lesson_requested_wins() {
        let lessons = vec![
            entry(1, (1, 1), 60, true),
            entry(2, (1, 2), 60, false),
            entry(3, (2, 1), 60, false),
        ];
        assert_eq!(resolve_active_lesson(&lessons, Some(3)), Some(3));
    }

    #[test]
    fn test_active_lesson_requested_outside_course_ignored() {
        let lessons = vec![entry(1, (1, 1), 60, false)];
        assert_eq!(resolve_active_lesson(&lessons, Some(99)), Some(1));
    }

    #[test]
    fn test_active_lesson_first_incomplete_in_display_order() {
        let lessons = vec![
            entry(3, (2, 1), 60, false),
            entry(1, (1, 1), 60, true),
            entry(2, (1, 2), 60, false),
        ];
        assert_eq!(resolve_active_lesson(&lessons, None), Some(2));
    }

    #[test]
    fn test_active_lesson_falls_back_to_last() {
        let lessons = vec![
            entry(1, (1, 1), 60, true),
            entry(2, (1, 2), 60, true),
        ];
        assert_eq!(resolve_active_lesson(&lessons, None), Some(2));
    }

    #[test]
    fn test_active_lesson_empty_course() {
        assert_eq!(resolve_active_lesson(&[], None), None);
        assert_eq!(resolve_active_lesson(&[], Some(1)), None);
    }

    #[test]
    fn test_active_lesson_belongs_to_course() {
        let lessons = vec![
            entry(10, (1, 1), 60, true),
            entry(11, (1, 2), 60, true),
            entry(12, (2, 1), 60, false),
        ];
        for requested in [None, Some(11), Some(999)] {
            let active = resolve_active_lesson(&lessons, requested).unwrap();
            assert!(lessons.iter().any(|l| l.lesson_id == active));
        }
    }

    #[test]
    fn test_track_percentage() {
        assert_eq!(track_percentage(&[]), 0.0);
        assert_eq!(track_percentage(&[100.0]), 100.0);
        assert_eq!(track_percentage(&[50.0, 100.0]), 75.0);
        assert_eq!(track_percentage(&[0.0, 0.0, 30.0]), 10.0);
    }
}
