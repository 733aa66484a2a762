//! Instructor lesson authoring endpoints

use actix_web::{HttpRequest, Responder, Scope, delete, post, put, web};
use serde::Deserialize;

use masar_api::model::{
    CONTENT_TYPE_ARTICLE, CONTENT_TYPE_VIDEO, RESOURCE_TYPE_PDF, RESOURCE_TYPE_URL,
    RESOURCE_TYPE_ZIP, ROLE_INSTRUCTOR,
};
use masar_api::validation;
use masar_catalog::service::lesson;

use crate::model::common::{self, AppState};
use crate::{Secured, secured};

use super::module::parse_id_list;

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LessonForm {
    title: String,
    kind: String,
    #[serde(default)]
    duration_seconds: i64,
    #[serde(default)]
    preview: bool,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContentForm {
    content_type: String,
    #[serde(default)]
    video_url: Option<String>,
    #[serde(default)]
    playback_provider: Option<String>,
    #[serde(default)]
    article_body: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateForm {
    module_id: i64,
    title: String,
    kind: String,
    #[serde(default)]
    duration_seconds: i64,
    #[serde(default)]
    preview: bool,
    content_type: String,
    #[serde(default)]
    video_url: Option<String>,
    #[serde(default)]
    playback_provider: Option<String>,
    #[serde(default)]
    article_body: Option<String>,
}

impl CreateForm {
    fn lesson_form(&self) -> LessonForm {
        LessonForm {
            title: self.title.clone(),
            kind: self.kind.clone(),
            duration_seconds: self.duration_seconds,
            preview: self.preview,
        }
    }

    fn content_form(&self) -> ContentForm {
        ContentForm {
            content_type: self.content_type.clone(),
            video_url: self.video_url.clone(),
            playback_provider: self.playback_provider.clone(),
            article_body: self.article_body.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateForm {
    lesson_id: i64,
    title: String,
    kind: String,
    #[serde(default)]
    duration_seconds: i64,
    #[serde(default)]
    preview: bool,
}

impl UpdateForm {
    fn lesson_form(&self) -> LessonForm {
        LessonForm {
            title: self.title.clone(),
            kind: self.kind.clone(),
            duration_seconds: self.duration_seconds,
            preview: self.preview,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContentUpdateForm {
    lesson_id: i64,
    content_type: String,
    #[serde(default)]
    video_url: Option<String>,
    #[serde(default)]
    playback_provider: Option<String>,
    #[serde(default)]
    article_body: Option<String>,
}

impl ContentUpdateForm {
    fn content_form(&self) -> ContentForm {
        ContentForm {
            content_type: self.content_type.clone(),
            video_url: self.video_url.clone(),
            playback_provider: self.playback_provider.clone(),
            article_body: self.article_body.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResourceForm {
    lesson_id: i64,
    resource_type: String,
    title: String,
    location: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResourceParam {
    resource_id: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReorderForm {
    module_id: i64,
    /// Comma-separated lesson ids in their new order
    ordered_ids: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LessonIdParam {
    lesson_id: i64,
}

impl LessonForm {
    fn validate(&self) -> Result<(), String> {
        if validation::validate_title(&self.title).is_err() {
            return Err("title is empty or too long".to_string());
        }
        if self.kind != CONTENT_TYPE_VIDEO && self.kind != CONTENT_TYPE_ARTICLE {
            return Err(format!("unknown lesson kind '{}'", self.kind));
        }
        if validation::validate_duration(self.duration_seconds).is_err() {
            return Err("duration out of bounds".to_string());
        }
        Ok(())
    }

    fn into_fields(self) -> lesson::LessonFields {
        lesson::LessonFields {
            title: self.title,
            kind: self.kind,
            duration_seconds: self.duration_seconds,
            preview: self.preview,
        }
    }
}

impl ContentForm {
    fn into_fields(self) -> lesson::ContentFields {
        lesson::ContentFields {
            content_type: self.content_type,
            video_url: self.video_url,
            playback_provider: self.playback_provider,
            article_body: self.article_body,
        }
    }
}

#[post("")]
async fn create(
    req: HttpRequest,
    data: web::Data<AppState>,
    params: web::Form<CreateForm>,
) -> impl Responder {
    let current_user = secured!(Secured::builder(&req, &data).role(ROLE_INSTRUCTOR).build());

    let lesson_form = params.lesson_form();
    if let Err(message) = lesson_form.validate() {
        return common::ApiException::handle_illegal_argument_exception(message);
    }

    let result = lesson::create(
        data.db(),
        current_user.id,
        params.module_id,
        lesson_form.into_fields(),
        params.content_form().into_fields(),
    )
    .await;

    match result {
        Ok(row) => common::Result::http_success(row),
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

    let lesson_form = params.lesson_form();
    if let Err(message) = lesson_form.validate() {
        return common::ApiException::handle_illegal_argument_exception(message);
    }

    let result = lesson::update(
        data.db(),
        current_user.id,
        params.lesson_id,
        lesson_form.into_fields(),
    )
    .await;

    match result {
        Ok(row) => common::Result::http_success(row),
        Err(err) => common::ApiException::handle_exception(req.path(), err),
    }
}

#[put("/content")]
async fn set_content(
    req: HttpRequest,
    data: web::Data<AppState>,
    params: web::Form<ContentUpdateForm>,
) -> impl Responder {
    let current_user = secured!(Secured::builder(&req, &data).role(ROLE_INSTRUCTOR).build());

    let result = lesson::set_content(
        data.db(),
        current_user.id,
        params.lesson_id,
        params.content_form().into_fields(),
    )
    .await;

    match result {
        Ok(()) => common::Result::http_success("update content ok!"),
        Err(err) => common::ApiException::handle_exception(req.path(), err),
    }
}

#[post("/resource")]
async fn add_resource(
    req: HttpRequest,
    data: web::Data<AppState>,
    params: web::Form<ResourceForm>,
) -> impl Responder {
    let current_user = secured!(Secured::builder(&req, &data).role(ROLE_INSTRUCTOR).build());

    let valid_type = matches!(
        params.resource_type.as_str(),
        RESOURCE_TYPE_PDF | RESOURCE_TYPE_ZIP | RESOURCE_TYPE_URL
    );
    if !valid_type {
        return common::ApiException::handle_illegal_argument_exception(format!(
            "unknown resource type '{}'",
            params.resource_type
        ));
    }
    if params.title.is_empty() || params.location.is_empty() {
        return common::ApiException::handle_illegal_argument_exception(
            "resource title and location are required".to_string(),
        );
    }

    let result = lesson::add_resource(
        data.db(),
        current_user.id,
        params.lesson_id,
        &params.resource_type,
        &params.title,
        &params.location,
    )
    .await;

    match result {
        Ok(row) => common::Result::http_success(row),
        Err(err) => common::ApiException::handle_exception(req.path(), err),
    }
}

#[delete("/resource")]
async fn remove_resource(
    req: HttpRequest,
    data: web::Data<AppState>,
    params: web::Query<ResourceParam>,
) -> impl Responder {
    let current_user = secured!(Secured::builder(&req, &data).role(ROLE_INSTRUCTOR).build());

    match lesson::remove_resource(data.db(), current_user.id, params.resource_id).await {
        Ok(()) => common::Result::http_success("delete resource ok!"),
        Err(err) => common::ApiException::handle_exception(req.path(), err),
    }
}

#[post("/reorder")]
async fn reorder(
    req: HttpRequest,
    data: web::Data<AppState>,
    params: web::Form<ReorderForm>,
) -> impl Responder {
    let current_user = secured!(Secured::builder(&req, &data).role(ROLE_INSTRUCTOR).build());

    let ordered_ids = match parse_id_list(&params.ordered_ids) {
        Ok(ids) => ids,
        Err(message) => return common::ApiException::handle_illegal_argument_exception(message),
    };

    match lesson::reorder(data.db(), current_user.id, params.module_id, &ordered_ids).await {
        Ok(()) => common::Result::http_success("reorder ok!"),
        Err(err) => common::ApiException::handle_exception(req.path(), err),
    }
}

#[delete("")]
async fn delete_lesson(
    req: HttpRequest,
    data: web::Data<AppState>,
    params: web::Query<LessonIdParam>,
) -> impl Responder {
    let current_user = secured!(Secured::builder(&req, &data).role(ROLE_INSTRUCTOR).build());

    match lesson::delete(data.db(), current_user.id, params.lesson_id).await {
        Ok(()) => common::Result::http_success("delete lesson ok!"),
        Err(err) => common::ApiException::handle_exception(req.path(), err),
    }
}

pub fn routes() -> Scope {
    web::scope("/lesson")
        .service(create)
        .service(update)
        .service(set_content)
        .service(add_resource)
        .service(remove_resource)
        .service(reorder)
        .service(delete_lesson)
}
