//! Public catalog endpoints
//!
//! Browse published courses and tracks. No authentication required; only
//! published entities are surfaced here.

use actix_web::{HttpRequest, HttpResponse, Responder, Scope, get, web};
use serde::Deserialize;

use masar_api::model::{DEFAULT_PAGE_NO, DEFAULT_PAGE_SIZE, EntityStatus, MAX_PAGE_SIZE};
use masar_catalog::CourseFilter;
use masar_catalog::service::{course, lesson, track};
use serde_json::json;

use crate::model::common::{self, AppState};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CourseListParam {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    level: Option<String>,
    page_no: Option<u64>,
    page_size: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CourseParam {
    id: Option<i64>,
    slug: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TrackListParam {
    #[serde(default)]
    text: Option<String>,
    page_no: Option<u64>,
    page_size: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TrackParam {
    id: i64,
}

fn page_bounds(page_no: Option<u64>, page_size: Option<u64>) -> (u64, u64) {
    (
        page_no.unwrap_or(DEFAULT_PAGE_NO).max(1),
        page_size.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE),
    )
}

#[get("/course/list")]
async fn course_list(
    req: HttpRequest,
    data: web::Data<AppState>,
    params: web::Query<CourseListParam>,
) -> impl Responder {
    let (page_no, page_size) = page_bounds(params.page_no, params.page_size);

    let filter = CourseFilter {
        text: params.text.clone().unwrap_or_default(),
        category: params.category.clone().unwrap_or_default(),
        level: params.level.clone().unwrap_or_default(),
        status: EntityStatus::Published.to_string(),
        instructor_id: None,
    };

    match course::search_page(data.db(), &filter, page_no, page_size).await {
        Ok(page) => common::Result::http_success(page),
        Err(err) => common::ApiException::handle_exception(req.path(), err),
    }
}

#[get("/course")]
async fn course_detail(
    req: HttpRequest,
    data: web::Data<AppState>,
    params: web::Query<CourseParam>,
) -> impl Responder {
    let found = match (&params.id, &params.slug) {
        (Some(id), _) => course::find_by_id(data.db(), *id).await,
        (None, Some(slug)) => course::find_by_slug(data.db(), slug).await,
        (None, None) => {
            return common::ApiException::handle_illegal_argument_exception(
                "either 'id' or 'slug' is required".to_string(),
            );
        }
    };

    let entity = match found {
        Ok(Some(entity)) => entity,
        Ok(None) => return not_found(req.path()),
        Err(err) => return common::ApiException::handle_exception(req.path(), err),
    };

    match course::detail(data.db(), entity, false).await {
        Ok(Some(detail)) => common::Result::http_success(detail),
        Ok(None) => not_found(req.path()),
        Err(err) => common::ApiException::handle_exception(req.path(), err),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LessonPreviewParam {
    lesson_id: i64,
}

/// Open a preview lesson without enrollment. Non-preview lessons stay
/// behind the classroom.
#[get("/lesson/preview")]
async fn lesson_preview(
    req: HttpRequest,
    data: web::Data<AppState>,
    params: web::Query<LessonPreviewParam>,
) -> impl Responder {
    match lesson::is_preview(data.db(), params.lesson_id).await {
        Ok(true) => {}
        Ok(false) => {
            return common::ErrorResult::http_response_forbidden(
                403,
                "lesson is not open for preview",
                req.path(),
            );
        }
        Err(err) => return common::ApiException::handle_exception(req.path(), err),
    }

    let content = match lesson::content_view(data.db(), params.lesson_id).await {
        Ok(content) => content,
        Err(err) => return common::ApiException::handle_exception(req.path(), err),
    };
    let resources = match lesson::resources(data.db(), params.lesson_id).await {
        Ok(resources) => resources,
        Err(err) => return common::ApiException::handle_exception(req.path(), err),
    };

    common::Result::http_success(json!({
        "lessonId": params.lesson_id,
        "content": content,
        "resources": resources,
    }))
}

#[get("/track/list")]
async fn track_list(
    req: HttpRequest,
    data: web::Data<AppState>,
    params: web::Query<TrackListParam>,
) -> impl Responder {
    let (page_no, page_size) = page_bounds(params.page_no, params.page_size);

    match track::search_page(
        data.db(),
        params.text.as_deref().unwrap_or_default(),
        true,
        page_no,
        page_size,
    )
    .await
    {
        Ok(page) => common::Result::http_success(page),
        Err(err) => common::ApiException::handle_exception(req.path(), err),
    }
}

#[get("/track")]
async fn track_detail(
    req: HttpRequest,
    data: web::Data<AppState>,
    params: web::Query<TrackParam>,
) -> impl Responder {
    match track::detail(data.db(), params.id).await {
        Ok(Some(detail)) if detail.summary.status == EntityStatus::Published.to_string() => {
            common::Result::http_success(detail)
        }
        Ok(_) => not_found(req.path()),
        Err(err) => common::ApiException::handle_exception(req.path(), err),
    }
}

fn not_found(path: &str) -> HttpResponse {
    common::Result::<String>::http_response(
        404,
        masar_common::error::RESOURCE_NOT_FOUND.code,
        "resource not found".to_string(),
        path.to_string(),
    )
}

pub fn routes() -> Scope {
    web::scope("/catalog")
        .service(course_list)
        .service(course_detail)
        .service(lesson_preview)
        .service(track_list)
        .service(track_detail)
}
