//! Instructor authoring endpoints

pub mod course;
pub mod dashboard;
pub mod lesson;
pub mod module;

use actix_web::{Scope, web};

pub fn routes() -> Scope {
    web::scope("/instructor")
        .service(course::routes())
        .service(module::routes())
        .service(lesson::routes())
        .service(dashboard::routes())
}
