//! SeaORM entity definitions for the Masar schema
//!
//! One module per table. Subtype hierarchies of the domain model (learning
//! entity, lesson content, lesson resource, enrollment, certificate) are
//! stored flat with a discriminator column; the service layer interprets it.

pub mod certificates;
pub mod enrollments;
pub mod instructor_profiles;
pub mod learning_entities;
pub mod lesson_contents;
pub mod lesson_progress;
pub mod lesson_resources;
pub mod lessons;
pub mod modules;
pub mod notifications;
pub mod operation_log;
pub mod student_profiles;
pub mod track_courses;
pub mod users;

pub mod prelude;
