//! Instructor dashboard endpoint

use actix_web::{HttpRequest, Responder, Scope, get, web};

use masar_api::model::ROLE_INSTRUCTOR;
use masar_learning::service::dashboard;

use crate::model::common::{self, AppState};
use crate::{Secured, secured};

#[get("")]
async fn instructor_dashboard(req: HttpRequest, data: web::Data<AppState>) -> impl Responder {
    let current_user = secured!(Secured::builder(&req, &data).role(ROLE_INSTRUCTOR).build());

    match dashboard::instructor_dashboard(data.db(), current_user.id).await {
        Ok(view) => common::Result::http_success(view),
        Err(err) => common::ApiException::handle_exception(req.path(), err),
    }
}

pub fn routes() -> Scope {
    web::scope("/dashboard").service(instructor_dashboard)
}
