//! Course moderation endpoints
//!
//! Courses submitted by instructors queue as PENDING; admins approve,
//! reject, or archive them. The authoring instructor is notified of each
//! verdict.

use actix_web::{HttpRequest, Responder, Scope, get, post, web};
use serde::Deserialize;

use masar_api::model::{
    DEFAULT_PAGE_NO, DEFAULT_PAGE_SIZE, EntityStatus, MAX_PAGE_SIZE, ROLE_ADMIN,
};
use masar_catalog::CourseFilter;
use masar_catalog::service::course;
use masar_learning::service::notification;
use masar_persistence::audit::{self, AuditEntry};
use masar_persistence::entity::learning_entities;

use crate::model::common::{self, AppState};
use crate::{Secured, secured};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReviewListParam {
    page_no: Option<u64>,
    page_size: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CourseIdForm {
    course_id: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RejectForm {
    course_id: i64,
    #[serde(default)]
    reason: String,
}

#[get("/review/list")]
async fn review_list(
    req: HttpRequest,
    data: web::Data<AppState>,
    params: web::Query<ReviewListParam>,
) -> impl Responder {
    secured!(Secured::builder(&req, &data).role(ROLE_ADMIN).build());

    let page_no = params.page_no.unwrap_or(DEFAULT_PAGE_NO).max(1);
    let page_size = params
        .page_size
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);

    let filter = CourseFilter {
        text: String::new(),
        category: String::new(),
        level: String::new(),
        status: EntityStatus::Pending.to_string(),
        instructor_id: None,
    };

    match course::search_page(data.db(), &filter, page_no, page_size).await {
        Ok(page) => common::Result::http_success(page),
        Err(err) => common::ApiException::handle_exception(req.path(), err),
    }
}

#[post("/approve")]
async fn approve(
    req: HttpRequest,
    data: web::Data<AppState>,
    params: web::Form<CourseIdForm>,
) -> impl Responder {
    let admin = secured!(Secured::builder(&req, &data).role(ROLE_ADMIN).build());

    match course::approve(data.db(), params.course_id).await {
        Ok(row) => {
            record_verdict(&req, &data, &admin.username, "APPROVE", &row).await;
            notify_instructor(
                &data,
                &row,
                "Course published",
                &format!("Your course \"{}\" was approved and is now live.", row.title),
            )
            .await;
            common::Result::http_success("approve ok!")
        }
        Err(err) => common::ApiException::handle_exception(req.path(), err),
    }
}

#[post("/reject")]
async fn reject(
    req: HttpRequest,
    data: web::Data<AppState>,
    params: web::Form<RejectForm>,
) -> impl Responder {
    let admin = secured!(Secured::builder(&req, &data).role(ROLE_ADMIN).build());

    match course::reject(data.db(), params.course_id).await {
        Ok(row) => {
            record_verdict(&req, &data, &admin.username, "REJECT", &row).await;
            let body = if params.reason.is_empty() {
                format!("Your course \"{}\" was rejected.", row.title)
            } else {
                format!(
                    "Your course \"{}\" was rejected: {}",
                    row.title, params.reason
                )
            };
            notify_instructor(&data, &row, "Course rejected", &body).await;
            common::Result::http_success("reject ok!")
        }
        Err(err) => common::ApiException::handle_exception(req.path(), err),
    }
}

#[post("/archive")]
async fn archive(
    req: HttpRequest,
    data: web::Data<AppState>,
    params: web::Form<CourseIdForm>,
) -> impl Responder {
    let admin = secured!(Secured::builder(&req, &data).role(ROLE_ADMIN).build());

    match course::archive(data.db(), params.course_id).await {
        Ok(row) => {
            record_verdict(&req, &data, &admin.username, "ARCHIVE", &row).await;
            notify_instructor(
                &data,
                &row,
                "Course archived",
                &format!("Your course \"{}\" was archived and is no longer listed.", row.title),
            )
            .await;
            common::Result::http_success("archive ok!")
        }
        Err(err) => common::ApiException::handle_exception(req.path(), err),
    }
}

async fn record_verdict(
    req: &HttpRequest,
    data: &web::Data<AppState>,
    operator: &str,
    operation: &str,
    course: &learning_entities::Model,
) {
    audit::record(
        data.db(),
        AuditEntry {
            operation,
            resource_type: "COURSE",
            resource_id: Some(course.id.to_string()),
            operator,
            source_ip: req.peer_addr().map(|a| a.ip().to_string()),
            result: audit::RESULT_SUCCESS,
            error_message: None,
            details: None,
        },
    )
    .await;
}

async fn notify_instructor(
    data: &web::Data<AppState>,
    course: &learning_entities::Model,
    title: &str,
    body: &str,
) {
    if let Some(instructor_id) = course.instructor_id
        && let Err(e) = notification::push(data.db(), instructor_id, title, body).await
    {
        tracing::warn!("failed to notify instructor: {}", e);
    }
}

pub fn routes() -> Scope {
    web::scope("/course")
        .service(review_list)
        .service(approve)
        .service(reject)
        .service(archive)
}
