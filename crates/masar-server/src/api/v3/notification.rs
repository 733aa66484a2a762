//! Notification endpoints, polled by clients

use actix_web::{HttpRequest, Responder, Scope, get, put, web};
use serde::Deserialize;
use serde_json::json;

use masar_api::model::{DEFAULT_PAGE_NO, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use masar_learning::service::notification;

use crate::model::common::{self, AppState};
use crate::{Secured, secured};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageParam {
    page_no: Option<u64>,
    page_size: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReadForm {
    notification_id: i64,
}

#[get("/list")]
async fn list(
    req: HttpRequest,
    data: web::Data<AppState>,
    params: web::Query<PageParam>,
) -> impl Responder {
    let current_user = secured!(Secured::builder(&req, &data).build());

    let page_no = params.page_no.unwrap_or(DEFAULT_PAGE_NO).max(1);
    let page_size = params
        .page_size
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);

    match notification::find_page_by_user(data.db(), current_user.id, page_no, page_size).await {
        Ok(page) => common::Result::http_success(page),
        Err(err) => common::ApiException::handle_exception(req.path(), err),
    }
}

#[get("/unread-count")]
async fn unread_count(req: HttpRequest, data: web::Data<AppState>) -> impl Responder {
    let current_user = secured!(Secured::builder(&req, &data).build());

    match notification::unread_count(data.db(), current_user.id).await {
        Ok(count) => common::Result::http_success(json!({ "unreadCount": count })),
        Err(err) => common::ApiException::handle_exception(req.path(), err),
    }
}

#[put("/read")]
async fn mark_read(
    req: HttpRequest,
    data: web::Data<AppState>,
    params: web::Form<ReadForm>,
) -> impl Responder {
    let current_user = secured!(Secured::builder(&req, &data).build());

    match notification::mark_read(data.db(), current_user.id, params.notification_id).await {
        Ok(()) => common::Result::http_success("mark read ok!"),
        Err(err) => common::ApiException::handle_exception(req.path(), err),
    }
}

#[put("/read-all")]
async fn mark_all_read(req: HttpRequest, data: web::Data<AppState>) -> impl Responder {
    let current_user = secured!(Secured::builder(&req, &data).build());

    match notification::mark_all_read(data.db(), current_user.id).await {
        Ok(()) => common::Result::http_success("mark all read ok!"),
        Err(err) => common::ApiException::handle_exception(req.path(), err),
    }
}

pub fn routes() -> Scope {
    web::scope("/notification")
        .service(list)
        .service(unread_count)
        .service(mark_read)
        .service(mark_all_read)
}
