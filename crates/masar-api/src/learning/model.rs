//! Learning API models
//!
//! Response shapes for enrollment, classroom, certificate, dashboard, and
//! notification data.

use serde::{Deserialize, Serialize};

use crate::catalog::{LessonContentView, LessonResourceView};

/// Enrollment row as shown in the student's "my learning" list
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentView {
    pub id: i64,
    pub enrollment_type: String,
    pub entity_id: i64,
    pub title: String,
    pub slug: String,
    pub thumbnail_path: Option<String>,
    pub progress_percentage: f64,
    pub enrolled_at: i64,
    pub completed_at: Option<i64>,
}

/// Aggregated course statistics heading the classroom view
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassroomCourse {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub total_lessons: u64,
    pub completed_lessons: u64,
    pub total_duration_seconds: i64,
    pub completed_duration_seconds: i64,
    pub progress_percentage: f64,
}

/// Lesson row in the classroom sidebar with the student's completion flag
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassroomLesson {
    pub id: i64,
    pub title: String,
    pub position: i32,
    pub kind: String,
    pub duration_seconds: i64,
    pub completed: bool,
}

/// Module grouping in the classroom sidebar
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassroomModule {
    pub id: i64,
    pub title: String,
    pub position: i32,
    pub lessons: Vec<ClassroomLesson>,
}

/// The lesson currently open in the classroom, with full content
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveLesson {
    pub id: i64,
    pub module_id: i64,
    pub title: String,
    pub kind: String,
    pub duration_seconds: i64,
    pub completed: bool,
    pub content: Option<LessonContentView>,
    pub resources: Vec<LessonResourceView>,
}

/// Complete classroom payload for one student and course
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassroomView {
    pub course: ClassroomCourse,
    pub modules: Vec<ClassroomModule>,
    pub active_lesson: Option<ActiveLesson>,
}

/// Result of a lesson completion toggle: the recomputed course stats
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressUpdateResult {
    pub lesson_id: i64,
    pub completed: bool,
    pub course_id: i64,
    pub progress_percentage: f64,
    pub course_completed: bool,
    pub certificate_serial: Option<String>,
}

/// Issued certificate as listed and verified
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateView {
    pub id: i64,
    pub certificate_type: String,
    pub entity_id: i64,
    pub entity_title: String,
    pub student_name: String,
    pub serial_number: String,
    pub issued_at: i64,
}

/// Lesson recently completed by a student, for the dashboard activity feed
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentLesson {
    pub lesson_id: i64,
    pub lesson_title: String,
    pub course_id: i64,
    pub course_title: String,
    pub completed_at: i64,
}

/// Student home dashboard aggregates
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentDashboard {
    pub active_enrollments: u64,
    pub completed_enrollments: u64,
    pub certificates_earned: u64,
    pub average_progress: f64,
    pub recent_lessons: Vec<RecentLesson>,
}

/// Per-course statistics row on the instructor dashboard
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstructorCourseStat {
    pub course_id: i64,
    pub title: String,
    pub status: String,
    pub enrollment_count: u64,
    pub average_progress: f64,
}

/// Instructor teaching dashboard aggregates
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstructorDashboard {
    pub total_courses: u64,
    pub published_courses: u64,
    pub draft_courses: u64,
    pub pending_courses: u64,
    pub total_students: u64,
    pub average_progress: f64,
    pub courses: Vec<InstructorCourseStat>,
}

/// Enrolled student row on the instructor's course-students page
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrolledStudent {
    pub student_id: i64,
    pub username: String,
    pub display_name: String,
    pub progress_percentage: f64,
    pub enrolled_at: i64,
    pub completed_at: Option<i64>,
}

/// Persisted notification as returned to clients
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationView {
    pub id: i64,
    pub title: String,
    pub body: String,
    pub read: bool,
    pub create_time: i64,
}
