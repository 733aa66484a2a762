//! Admin user management endpoints

use actix_web::{HttpRequest, HttpResponse, Responder, delete, get, put, web};
use serde::Deserialize;

use masar_api::model::{MAX_PAGE_SIZE, ROLE_ADMIN};
use masar_common::error::MasarError;
use masar_persistence::audit::{self, AuditEntry};

use crate::model::common::{self, AppState};
use crate::{Secured, secured};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchPageParam {
    search: Option<String>,
    username: Option<String>,
    role: Option<String>,
    page_no: u64,
    page_size: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserParam {
    username: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EnabledForm {
    username: String,
    enabled: bool,
}

#[get("/user/list")]
async fn search_page(
    req: HttpRequest,
    data: web::Data<AppState>,
    params: web::Query<SearchPageParam>,
) -> impl Responder {
    secured!(Secured::builder(&req, &data).role(ROLE_ADMIN).build());

    let accurate = params.search.clone().unwrap_or_default() == "accurate";
    let mut username = params.username.clone().unwrap_or_default();

    if let Some(stripped) = username.strip_prefix("*") {
        username = stripped.to_string();
    }
    if let Some(stripped) = username.strip_suffix("*") {
        username = stripped.to_string();
    }

    let page_size = params.page_size.clamp(1, MAX_PAGE_SIZE);
    let page_no = params.page_no.max(1);

    let result = match masar_auth::service::user::search_page(
        data.db(),
        &username,
        params.role.as_deref().unwrap_or_default(),
        page_no,
        page_size,
        accurate,
    )
    .await
    {
        Ok(page) => page,
        Err(e) => {
            tracing::error!("Failed to search users: {}", e);
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "code": 500,
                "message": "Failed to search users from database",
                "data": null
            }));
        }
    };

    common::Result::http_success(result)
}

#[put("/user/enabled")]
async fn set_enabled(
    req: HttpRequest,
    data: web::Data<AppState>,
    params: web::Form<EnabledForm>,
) -> impl Responder {
    let admin = secured!(Secured::builder(&req, &data).role(ROLE_ADMIN).build());

    let result =
        masar_auth::service::user::set_enabled(data.db(), &params.username, params.enabled).await;

    match result {
        Ok(()) => {
            audit::record(
                data.db(),
                AuditEntry {
                    operation: if params.enabled { "ENABLE" } else { "DISABLE" },
                    resource_type: "USER",
                    resource_id: Some(params.username.clone()),
                    operator: &admin.username,
                    source_ip: req.peer_addr().map(|a| a.ip().to_string()),
                    result: audit::RESULT_SUCCESS,
                    error_message: None,
                    details: None,
                },
            )
            .await;
            common::Result::http_success("update user ok!")
        }
        Err(err) => common::ApiException::handle_exception(req.path(), err),
    }
}

#[delete("/user")]
async fn delete(
    req: HttpRequest,
    data: web::Data<AppState>,
    params: web::Query<UserParam>,
) -> impl Responder {
    let admin = secured!(Secured::builder(&req, &data).role(ROLE_ADMIN).build());

    let result = masar_auth::service::user::delete(data.db(), &params.username).await;

    match result {
        Ok(()) => {
            audit::record(
                data.db(),
                AuditEntry {
                    operation: "DELETE",
                    resource_type: "USER",
                    resource_id: Some(params.username.clone()),
                    operator: &admin.username,
                    source_ip: req.peer_addr().map(|a| a.ip().to_string()),
                    result: audit::RESULT_SUCCESS,
                    error_message: None,
                    details: None,
                },
            )
            .await;
            common::Result::http_success("delete user ok!")
        }
        Err(err) => {
            let code = match err.downcast_ref() {
                Some(MasarError::UserNotExist(_)) => 404,
                Some(MasarError::IllegalArgument(_)) => 400,
                _ => 500,
            };

            common::Result::<String>::http_response(
                code as u16,
                code,
                err.to_string(),
                err.to_string(),
            )
        }
    }
}
