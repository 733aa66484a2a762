//! Student endpoints: enrollments, dashboard, certificates

use actix_web::{HttpRequest, HttpResponse, Responder, Scope, delete, get, post, web};
use serde::Deserialize;

use masar_api::model::{DEFAULT_PAGE_NO, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, ROLE_STUDENT};
use masar_learning::service::{certificate, dashboard, enrollment};
use masar_persistence::audit::{self, AuditEntry};

use crate::model::common::{self, AppState};
use crate::{Secured, secured};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EnrollmentForm {
    entity_id: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EnrollmentParam {
    entity_id: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageParam {
    page_no: Option<u64>,
    page_size: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SerialParam {
    serial_number: String,
}

#[post("/enrollment")]
async fn enroll(
    req: HttpRequest,
    data: web::Data<AppState>,
    params: web::Form<EnrollmentForm>,
) -> impl Responder {
    let current_user = secured!(Secured::builder(&req, &data).role(ROLE_STUDENT).build());

    match enrollment::enroll(data.db(), current_user.id, params.entity_id).await {
        Ok(row) => {
            audit::record(
                data.db(),
                AuditEntry {
                    operation: "CREATE",
                    resource_type: "ENROLLMENT",
                    resource_id: Some(row.id.to_string()),
                    operator: &current_user.username,
                    source_ip: req.peer_addr().map(|a| a.ip().to_string()),
                    result: audit::RESULT_SUCCESS,
                    error_message: None,
                    details: Some(format!("{{\"entityId\":{}}}", params.entity_id)),
                },
            )
            .await;
            common::Result::http_success(row)
        }
        Err(err) => common::ApiException::handle_exception(req.path(), err),
    }
}

#[delete("/enrollment")]
async fn unenroll(
    req: HttpRequest,
    data: web::Data<AppState>,
    params: web::Query<EnrollmentParam>,
) -> impl Responder {
    let current_user = secured!(Secured::builder(&req, &data).role(ROLE_STUDENT).build());

    match enrollment::unenroll(data.db(), current_user.id, params.entity_id).await {
        Ok(()) => common::Result::http_success("unenroll ok!"),
        Err(err) => common::ApiException::handle_exception(req.path(), err),
    }
}

#[get("/enrollment/list")]
async fn enrollment_list(
    req: HttpRequest,
    data: web::Data<AppState>,
    params: web::Query<PageParam>,
) -> impl Responder {
    let current_user = secured!(Secured::builder(&req, &data).role(ROLE_STUDENT).build());

    let page_no = params.page_no.unwrap_or(DEFAULT_PAGE_NO).max(1);
    let page_size = params
        .page_size
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);

    match enrollment::find_page_by_student(data.db(), current_user.id, page_no, page_size).await {
        Ok(page) => common::Result::http_success(page),
        Err(err) => common::ApiException::handle_exception(req.path(), err),
    }
}

#[get("/dashboard")]
async fn student_dashboard(req: HttpRequest, data: web::Data<AppState>) -> impl Responder {
    let current_user = secured!(Secured::builder(&req, &data).role(ROLE_STUDENT).build());

    match dashboard::student_dashboard(data.db(), current_user.id).await {
        Ok(view) => common::Result::http_success(view),
        Err(err) => common::ApiException::handle_exception(req.path(), err),
    }
}

#[get("/certificate/list")]
async fn certificate_list(req: HttpRequest, data: web::Data<AppState>) -> impl Responder {
    let current_user = secured!(Secured::builder(&req, &data).role(ROLE_STUDENT).build());

    match certificate::find_by_student(data.db(), current_user.id).await {
        Ok(views) => common::Result::http_success(views),
        Err(err) => common::ApiException::handle_exception(req.path(), err),
    }
}

/// Download one of the caller's certificates as a printable HTML attachment.
#[get("/certificate/download")]
async fn certificate_download(
    req: HttpRequest,
    data: web::Data<AppState>,
    params: web::Query<SerialParam>,
) -> impl Responder {
    let current_user = secured!(Secured::builder(&req, &data).role(ROLE_STUDENT).build());

    match certificate::find_owned_by_serial(data.db(), current_user.id, &params.serial_number)
        .await
    {
        Ok(view) => {
            let html = certificate::render_html(&view);
            let filename = format!("certificate_{}.html", view.serial_number);

            HttpResponse::Ok()
                .content_type("text/html; charset=utf-8")
                .insert_header((
                    "Content-Disposition",
                    format!("attachment; filename=\"{}\"", filename),
                ))
                .body(html)
        }
        Err(err) => common::ApiException::handle_exception(req.path(), err),
    }
}

pub fn routes() -> Scope {
    web::scope("/student")
        .service(enroll)
        .service(unenroll)
        .service(enrollment_list)
        .service(student_dashboard)
        .service(certificate_list)
        .service(certificate_download)
}
