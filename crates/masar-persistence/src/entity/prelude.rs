//! Re-exports of all entity types under their table names

pub use super::certificates::Entity as Certificates;
pub use super::enrollments::Entity as Enrollments;
pub use super::instructor_profiles::Entity as InstructorProfiles;
pub use super::learning_entities::Entity as LearningEntities;
pub use super::lesson_contents::Entity as LessonContents;
pub use super::lesson_progress::Entity as LessonProgress;
pub use super::lesson_resources::Entity as LessonResources;
pub use super::lessons::Entity as Lessons;
pub use super::modules::Entity as Modules;
pub use super::notifications::Entity as Notifications;
pub use super::operation_log::Entity as OperationLog;
pub use super::student_profiles::Entity as StudentProfiles;
pub use super::track_courses::Entity as TrackCourses;
pub use super::users::Entity as Users;
