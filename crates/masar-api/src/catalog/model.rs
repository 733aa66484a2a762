//! Catalog API models
//!
//! Response shapes for course, track, module, and lesson data as served to
//! the public catalog and the instructor authoring surface.

use serde::{Deserialize, Serialize};

/// Course information as listed in the catalog and instructor course tables
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseSummary {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub category: String,
    pub level: String,
    pub thumbnail_path: Option<String>,
    pub status: String,
    pub instructor_id: i64,
    pub instructor_name: String,
    pub lesson_count: u64,
    pub total_duration_seconds: i64,
    pub create_time: i64,
}

/// Full course view with its module/lesson outline
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseDetail {
    #[serde(flatten)]
    pub summary: CourseSummary,
    pub modules: Vec<ModuleOutline>,
}

/// Module with its ordered lesson outline
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleOutline {
    pub id: i64,
    pub title: String,
    pub position: i32,
    pub lessons: Vec<LessonOutline>,
}

/// Lesson row in a course outline
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonOutline {
    pub id: i64,
    pub title: String,
    pub position: i32,
    pub kind: String,
    pub duration_seconds: i64,
    pub preview: bool,
}

/// Lesson content payload (video or article variant)
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonContentView {
    pub content_type: String,
    pub video_url: Option<String>,
    pub playback_provider: Option<String>,
    pub article_body: Option<String>,
}

/// Downloadable or linked lesson resource
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonResourceView {
    pub id: i64,
    pub resource_type: String,
    pub title: String,
    pub location: String,
}

/// Track information as listed in the catalog
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackSummary {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub category: String,
    pub status: String,
    pub course_count: u64,
    pub create_time: i64,
}

/// Full track view with its ordered member courses
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackDetail {
    #[serde(flatten)]
    pub summary: TrackSummary,
    pub courses: Vec<TrackCourseEntry>,
}

/// Course membership row inside a track
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackCourseEntry {
    pub position: i32,
    #[serde(flatten)]
    pub course: CourseSummary,
}
