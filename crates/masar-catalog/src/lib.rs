//! Masar Catalog - Authoring and browsing services
//!
//! Courses, tracks, modules, lessons, lesson content variants, and lesson
//! resources: creation and editing by instructors, moderation transitions,
//! and the public catalog queries.

pub mod model;
pub mod service;

pub use model::CourseFilter;
