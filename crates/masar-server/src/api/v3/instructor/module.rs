//! Instructor module authoring endpoints

use actix_web::{HttpRequest, Responder, Scope, delete, post, put, web};
use serde::Deserialize;

use masar_api::model::ROLE_INSTRUCTOR;
use masar_api::validation;
use masar_catalog::service::module;

use crate::model::common::{self, AppState};
use crate::{Secured, secured};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateForm {
    course_id: i64,
    title: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RenameForm {
    module_id: i64,
    title: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReorderForm {
    course_id: i64,
    /// Comma-separated module ids in their new order
    ordered_ids: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModuleIdParam {
    module_id: i64,
}

pub(crate) fn parse_id_list(raw: &str) -> Result<Vec<i64>, String> {
    raw.split(',')
        .filter(|s| !s.trim().is_empty())
        .map(|s| {
            s.trim()
                .parse::<i64>()
                .map_err(|_| format!("'{}' is not a valid id", s.trim()))
        })
        .collect()
}

#[post("")]
async fn create(
    req: HttpRequest,
    data: web::Data<AppState>,
    params: web::Form<CreateForm>,
) -> impl Responder {
    let current_user = secured!(Secured::builder(&req, &data).role(ROLE_INSTRUCTOR).build());

    if validation::validate_title(&params.title).is_err() {
        return common::ApiException::handle_illegal_argument_exception(
            "title is empty or too long".to_string(),
        );
    }

    match module::create(data.db(), current_user.id, params.course_id, &params.title).await {
        Ok(row) => common::Result::http_success(row),
        Err(err) => common::ApiException::handle_exception(req.path(), err),
    }
}

#[put("")]
async fn rename(
    req: HttpRequest,
    data: web::Data<AppState>,
    params: web::Form<RenameForm>,
) -> impl Responder {
    let current_user = secured!(Secured::builder(&req, &data).role(ROLE_INSTRUCTOR).build());

    if validation::validate_title(&params.title).is_err() {
        return common::ApiException::handle_illegal_argument_exception(
            "title is empty or too long".to_string(),
        );
    }

    match module::rename(data.db(), current_user.id, params.module_id, &params.title).await {
        Ok(row) => common::Result::http_success(row),
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

    match module::reorder(data.db(), current_user.id, params.course_id, &ordered_ids).await {
        Ok(()) => common::Result::http_success("reorder ok!"),
        Err(err) => common::ApiException::handle_exception(req.path(), err),
    }
}

#[delete("")]
async fn delete_module(
    req: HttpRequest,
    data: web::Data<AppState>,
    params: web::Query<ModuleIdParam>,
) -> impl Responder {
    let current_user = secured!(Secured::builder(&req, &data).role(ROLE_INSTRUCTOR).build());

    match module::delete(data.db(), current_user.id, params.module_id).await {
        Ok(()) => common::Result::http_success("delete module ok!"),
        Err(err) => common::ApiException::handle_exception(req.path(), err),
    }
}

pub fn routes() -> Scope {
    web::scope("/module")
        .service(create)
        .service(rename)
        .service(reorder)
        .service(delete_module)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id_list() {
        assert_eq!(parse_id_list("1,2,3").unwrap(), vec![1, 2, 3]);
        assert_eq!(parse_id_list(" 4 , 5 ").unwrap(), vec![4, 5]);
        assert_eq!(parse_id_list("").unwrap(), Vec::<i64>::new());
        assert!(parse_id_list("1,x").is_err());
    }
}
