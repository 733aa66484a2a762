//! Instructor course authoring endpoints

use actix_web::{HttpRequest, Responder, Scope, delete, get, post, put, web};
use actix_multipart::Multipart;
use futures::StreamExt;
use serde::Deserialize;
use tracing::warn;

use masar_api::model::{
    DEFAULT_PAGE_NO, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, ROLE_INSTRUCTOR,
};
use masar_api::validation;
use masar_catalog::CourseFilter;
use masar_catalog::service::course;
use masar_persistence::audit::{self, AuditEntry};

use crate::model::common::{self, AppState, MAX_THUMBNAIL_BYTES};
use crate::{Secured, secured};

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseForm {
    pub title: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub level: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CourseIdForm {
    course_id: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CourseIdParam {
    course_id: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateForm {
    course_id: i64,
    title: String,
    #[serde(default)]
    slug: Option<String>,
    #[serde(default)]
    description: String,
    #[serde(default)]
    category: String,
    #[serde(default)]
    level: String,
}

impl UpdateForm {
    fn course_form(&self) -> CourseForm {
        CourseForm {
            title: self.title.clone(),
            slug: self.slug.clone(),
            description: self.description.clone(),
            category: self.category.clone(),
            level: self.level.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListParam {
    #[serde(default)]
    status: Option<String>,
    page_no: Option<u64>,
    page_size: Option<u64>,
}

impl CourseForm {
    fn validate(&self) -> Result<(), String> {
        if validation::validate_title(&self.title).is_err() {
            return Err("title is empty or too long".to_string());
        }
        if let Some(slug) = &self.slug
            && validation::validate_slug(slug).is_err()
        {
            return Err("slug contains invalid characters".to_string());
        }
        Ok(())
    }

    fn into_fields(self) -> course::CourseFields {
        course::CourseFields {
            title: self.title,
            slug: self.slug,
            description: self.description,
            category: self.category,
            level: self.level,
        }
    }
}

#[post("")]
async fn create(
    req: HttpRequest,
    data: web::Data<AppState>,
    params: web::Form<CourseForm>,
) -> impl Responder {
    let current_user = secured!(Secured::builder(&req, &data).role(ROLE_INSTRUCTOR).build());

    if let Err(message) = params.validate() {
        return common::ApiException::handle_illegal_argument_exception(message);
    }

    let result = course::create(data.db(), current_user.id, params.into_inner().into_fields()).await;

    match result {
        Ok(row) => {
            audit::record(
                data.db(),
                AuditEntry {
                    operation: "CREATE",
                    resource_type: "COURSE",
                    resource_id: Some(row.id.to_string()),
                    operator: &current_user.username,
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

#[put("")]
async fn update(
    req: HttpRequest,
    data: web::Data<AppState>,
    params: web::Form<UpdateForm>,
) -> impl Responder {
    let current_user = secured!(Secured::builder(&req, &data).role(ROLE_INSTRUCTOR).build());

    let fields = params.course_form();
    if let Err(message) = fields.validate() {
        return common::ApiException::handle_illegal_argument_exception(message);
    }

    let result = course::update(
        data.db(),
        current_user.id,
        params.course_id,
        fields.into_fields(),
    )
    .await;

    match result {
        Ok(row) => common::Result::http_success(row),
        Err(err) => common::ApiException::handle_exception(req.path(), err),
    }
}

#[delete("")]
async fn delete_course(
    req: HttpRequest,
    data: web::Data<AppState>,
    params: web::Query<CourseIdParam>,
) -> impl Responder {
    let current_user = secured!(Secured::builder(&req, &data).role(ROLE_INSTRUCTOR).build());

    let result = course::delete(data.db(), current_user.id, params.course_id).await;

    match result {
        Ok(()) => {
            audit::record(
                data.db(),
                AuditEntry {
                    operation: "DELETE",
                    resource_type: "COURSE",
                    resource_id: Some(params.course_id.to_string()),
                    operator: &current_user.username,
                    source_ip: req.peer_addr().map(|a| a.ip().to_string()),
                    result: audit::RESULT_SUCCESS,
                    error_message: None,
                    details: None,
                },
            )
            .await;
            common::Result::http_success("delete course ok!")
        }
        Err(err) => common::ApiException::handle_exception(req.path(), err),
    }
}

#[post("/submit")]
async fn submit(
    req: HttpRequest,
    data: web::Data<AppState>,
    params: web::Form<CourseIdForm>,
) -> impl Responder {
    let current_user = secured!(Secured::builder(&req, &data).role(ROLE_INSTRUCTOR).build());

    match course::submit_for_review(data.db(), current_user.id, params.course_id).await {
        Ok(()) => common::Result::http_success("submitted for review"),
        Err(err) => common::ApiException::handle_exception(req.path(), err),
    }
}

/// Upload a course thumbnail as multipart form data (field name `file`).
#[post("/thumbnail")]
async fn upload_thumbnail(
    req: HttpRequest,
    data: web::Data<AppState>,
    params: web::Query<CourseIdParam>,
    mut payload: Multipart,
) -> impl Responder {
    let current_user = secured!(Secured::builder(&req, &data).role(ROLE_INSTRUCTOR).build());

    let mut file_data: Vec<u8> = Vec::new();
    let mut extension = "png".to_string();
    while let Some(field_result) = payload.next().await {
        let mut field = match field_result {
            Ok(f) => f,
            Err(e) => {
                warn!(error = %e, "Failed to read multipart field");
                return common::ApiException::handle_illegal_argument_exception(e.to_string());
            }
        };

        if let Some(content_disposition) = field.content_disposition()
            && content_disposition.get_name().is_some_and(|n| n == "file")
        {
            if let Some(filename) = content_disposition.get_filename()
                && let Some((_, ext)) = filename.rsplit_once('.')
                && ext.chars().all(|c| c.is_ascii_alphanumeric())
            {
                extension = ext.to_ascii_lowercase();
            }

            while let Some(chunk_result) = field.next().await {
                match chunk_result {
                    Ok(chunk) => {
                        file_data.extend_from_slice(&chunk);
                        if file_data.len() > MAX_THUMBNAIL_BYTES {
                            return common::ApiException::handle_illegal_argument_exception(
                                "thumbnail exceeds the size limit".to_string(),
                            );
                        }
                    }
                    Err(e) => {
                        warn!(error = %e, "Failed to read multipart chunk");
                        return common::ApiException::handle_illegal_argument_exception(
                            e.to_string(),
                        );
                    }
                }
            }
            break;
        }
    }

    if file_data.is_empty() {
        return common::ApiException::handle_illegal_argument_exception(
            "multipart field 'file' is required".to_string(),
        );
    }

    let thumbnail_dir = format!("{}/thumbnails", data.configuration.content_dir());
    if let Err(e) = std::fs::create_dir_all(&thumbnail_dir) {
        tracing::error!("failed to create thumbnail dir: {}", e);
        return common::ApiException::handle_exception(req.path(), e.into());
    }

    let relative_path = format!("thumbnails/course-{}.{}", params.course_id, extension);
    let full_path = format!("{}/{}", data.configuration.content_dir(), relative_path);
    if let Err(e) = std::fs::write(&full_path, &file_data) {
        tracing::error!("failed to write thumbnail: {}", e);
        return common::ApiException::handle_exception(req.path(), e.into());
    }

    match course::set_thumbnail(data.db(), current_user.id, params.course_id, &relative_path).await
    {
        Ok(()) => common::Result::http_success(relative_path),
        Err(err) => common::ApiException::handle_exception(req.path(), err),
    }
}

#[get("/list")]
async fn list(
    req: HttpRequest,
    data: web::Data<AppState>,
    params: web::Query<ListParam>,
) -> impl Responder {
    let current_user = secured!(Secured::builder(&req, &data).role(ROLE_INSTRUCTOR).build());

    let page_no = params.page_no.unwrap_or(DEFAULT_PAGE_NO).max(1);
    let page_size = params
        .page_size
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);

    let filter = CourseFilter {
        text: String::new(),
        category: String::new(),
        level: String::new(),
        status: params.status.clone().unwrap_or_default(),
        instructor_id: Some(current_user.id),
    };

    match course::search_page(data.db(), &filter, page_no, page_size).await {
        Ok(page) => common::Result::http_success(page),
        Err(err) => common::ApiException::handle_exception(req.path(), err),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StudentsParam {
    course_id: i64,
    page_no: Option<u64>,
    page_size: Option<u64>,
}

/// Paged roster of students enrolled in one of the caller's courses.
#[get("/students")]
async fn students(
    req: HttpRequest,
    data: web::Data<AppState>,
    params: web::Query<StudentsParam>,
) -> impl Responder {
    let current_user = secured!(Secured::builder(&req, &data).role(ROLE_INSTRUCTOR).build());

    let page_no = params.page_no.unwrap_or(DEFAULT_PAGE_NO).max(1);
    let page_size = params
        .page_size
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);

    match masar_learning::service::dashboard::course_students_page(
        data.db(),
        current_user.id,
        params.course_id,
        page_no,
        page_size,
    )
    .await
    {
        Ok(page) => common::Result::http_success(page),
        Err(err) => common::ApiException::handle_exception(req.path(), err),
    }
}

/// Authoring view of one of the caller's courses, drafts included.
#[get("")]
async fn detail(
    req: HttpRequest,
    data: web::Data<AppState>,
    params: web::Query<CourseIdParam>,
) -> impl Responder {
    let current_user = secured!(Secured::builder(&req, &data).role(ROLE_INSTRUCTOR).build());

    let entity = match course::find_owned(data.db(), params.course_id, current_user.id).await {
        Ok(entity) => entity,
        Err(err) => return common::ApiException::handle_exception(req.path(), err),
    };

    match course::detail(data.db(), entity, true).await {
        Ok(Some(detail)) => common::Result::http_success(detail),
        Ok(None) => common::Result::<String>::http_response(
            404,
            masar_common::error::COURSE_NOT_EXIST.code,
            "course not exist".to_string(),
            req.path().to_string(),
        ),
        Err(err) => common::ApiException::handle_exception(req.path(), err),
    }
}

pub fn routes() -> Scope {
    web::scope("/course")
        .service(create)
        .service(update)
        .service(delete_course)
        .service(submit)
        .service(upload_thumbnail)
        .service(list)
        .service(students)
        .service(detail)
}
