//! Admin track curation endpoints

use actix_web::{HttpRequest, Responder, Scope, delete, post, web};
use serde::Deserialize;

use masar_api::model::ROLE_ADMIN;
use masar_api::validation;
use masar_catalog::service::track;
use masar_persistence::audit::{self, AuditEntry};

use crate::model::common::{self, AppState};
use crate::{Secured, secured};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TrackForm {
    title: String,
    #[serde(default)]
    slug: Option<String>,
    #[serde(default)]
    description: String,
    #[serde(default)]
    category: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TrackIdForm {
    track_id: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MembershipForm {
    track_id: i64,
    course_id: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MembershipParam {
    track_id: i64,
    course_id: i64,
}

#[post("")]
async fn create(
    req: HttpRequest,
    data: web::Data<AppState>,
    params: web::Form<TrackForm>,
) -> impl Responder {
    let admin = secured!(Secured::builder(&req, &data).role(ROLE_ADMIN).build());

    if validation::validate_title(&params.title).is_err() {
        return common::ApiException::handle_illegal_argument_exception(
            "title is empty or too long".to_string(),
        );
    }
    if let Some(slug) = &params.slug
        && validation::validate_slug(slug).is_err()
    {
        return common::ApiException::handle_illegal_argument_exception(
            "slug contains invalid characters".to_string(),
        );
    }

    let params = params.into_inner();
    let result = track::create(
        data.db(),
        track::TrackFields {
            title: params.title,
            slug: params.slug,
            description: params.description,
            category: params.category,
        },
    )
    .await;

    match result {
        Ok(row) => {
            audit::record(
                data.db(),
                AuditEntry {
                    operation: "CREATE",
                    resource_type: "TRACK",
                    resource_id: Some(row.id.to_string()),
                    operator: &admin.username,
                    source_ip: req.peer_addr().map(|a| a.ip().to_string()),
                    result: audit::RESULT_SUCCESS,
                    error_message: None,
                    details: None,
                },
            )
            .await;
            common::Result::http_success(row)
        }
        Err(err) => common::ApiException::handle_exception(req.path(), err),
    }
}

#[post("/publish")]
async fn publish(
    req: HttpRequest,
    data: web::Data<AppState>,
    params: web::Form<TrackIdForm>,
) -> impl Responder {
    secured!(Secured::builder(&req, &data).role(ROLE_ADMIN).build());

    match track::publish(data.db(), params.track_id).await {
        Ok(()) => common::Result::http_success("publish ok!"),
        Err(err) => common::ApiException::handle_exception(req.path(), err),
    }
}

#[post("/course")]
async fn add_course(
    req: HttpRequest,
    data: web::Data<AppState>,
    params: web::Form<MembershipForm>,
) -> impl Responder {
    secured!(Secured::builder(&req, &data).role(ROLE_ADMIN).build());

    match track::add_course(data.db(), params.track_id, params.course_id).await {
        Ok(row) => common::Result::http_success(row),
        Err(err) => common::ApiException::handle_exception(req.path(), err),
    }
}

#[delete("/course")]
async fn remove_course(
    req: HttpRequest,
    data: web::Data<AppState>,
    params: web::Query<MembershipParam>,
) -> impl Responder {
    secured!(Secured::builder(&req, &data).role(ROLE_ADMIN).build());

    match track::remove_course(data.db(), params.track_id, params.course_id).await {
        Ok(()) => common::Result::http_success("remove course ok!"),
        Err(err) => common::ApiException::handle_exception(req.path(), err),
    }
}

pub fn routes() -> Scope {
    web::scope("/track")
        .service(create)
        .service(publish)
        .service(add_course)
        .service(remove_course)
}
