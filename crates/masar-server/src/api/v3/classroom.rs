//! Classroom endpoints
//!
//! The classroom view and lesson completion toggles for enrolled students.

use actix_web::{HttpRequest, Responder, Scope, get, put, web};
use serde::Deserialize;

use masar_api::model::ROLE_STUDENT;
use masar_learning::service::classroom;

use crate::model::common::{self, AppState};
use crate::{Secured, secured};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ClassroomParam {
    course_id: i64,
    lesson_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProgressForm {
    lesson_id: i64,
    completed: bool,
}

#[get("/course")]
async fn classroom_view(
    req: HttpRequest,
    data: web::Data<AppState>,
    params: web::Query<ClassroomParam>,
) -> impl Responder {
    let current_user = secured!(Secured::builder(&req, &data).role(ROLE_STUDENT).build());

    match classroom::classroom(
        data.db(),
        current_user.id,
        params.course_id,
        params.lesson_id,
    )
    .await
    {
        Ok(Some(view)) => common::Result::http_success(view),
        Ok(None) => common::ErrorResult::http_response_forbidden(
            403,
            "not enrolled in this course",
            req.path(),
        ),
        Err(err) => common::ApiException::handle_exception(req.path(), err),
    }
}

#[put("/lesson/progress")]
async fn update_progress(
    req: HttpRequest,
    data: web::Data<AppState>,
    params: web::Form<ProgressForm>,
) -> impl Responder {
    let current_user = secured!(Secured::builder(&req, &data).role(ROLE_STUDENT).build());

    match classroom::update_lesson_completion(
        data.db(),
        current_user.id,
        params.lesson_id,
        params.completed,
    )
    .await
    {
        Ok(result) => common::Result::http_success(result),
        Err(err) => common::ApiException::handle_exception(req.path(), err),
    }
}

pub fn routes() -> Scope {
    web::scope("/classroom")
        .service(classroom_view)
        .service(update_progress)
}
