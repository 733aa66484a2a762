//! Authentication endpoints: login, registration, password change

use actix_web::{HttpRequest, HttpResponse, Responder, post, put, web};
use serde::{Deserialize, Serialize};

use masar_api::model::{ROLE_INSTRUCTOR, ROLE_STUDENT};
use masar_api::validation;
use masar_auth::model::USER_NOT_FOUND_MESSAGE;
use masar_auth::service::auth::encode_jwt_token;
use masar_persistence::audit::{self, AuditEntry};

use crate::model::common::{self, AppState};
use crate::{Secured, secured};

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct LoginResult {
    access_token: String,
    token_ttl: i64,
    role: String,
    username: String,
}

#[derive(Deserialize)]
struct LoginData {
    username: Option<String>,
    password: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RegisterForm {
    username: String,
    password: String,
    email: String,
    display_name: String,
    #[serde(default)]
    role: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdatePasswordForm {
    old_password: String,
    new_password: String,
}

#[post("/user/login")]
async fn login(
    req: HttpRequest,
    data: web::Data<AppState>,
    form: Option<web::Form<LoginData>>,
    query: Option<web::Query<LoginData>>,
) -> impl Responder {
    let mut username: String = "".to_string();
    let mut password: String = "".to_string();

    // Credentials may arrive as query params or a form body; the form wins
    // when both are present.
    if let Some(query_data) = &query {
        if let Some(v) = &query_data.username {
            username = v.to_string();
        }
        if let Some(v) = &query_data.password {
            password = v.to_string();
        }
    }
    if let Some(form_data) = &form {
        if let Some(v) = &form_data.username
            && !v.is_empty()
        {
            username = v.to_string();
        }
        if let Some(v) = &form_data.password
            && !v.is_empty()
        {
            password = v.to_string();
        }
    }

    if username.is_empty() || password.is_empty() {
        return HttpResponse::Forbidden().body(USER_NOT_FOUND_MESSAGE);
    }

    let source_ip = req.peer_addr().map(|a| a.ip().to_string());

    let user = match masar_auth::service::user::authenticate(data.db(), &username, &password).await
    {
        Ok(user) => user,
        Err(e) => {
            tracing::warn!(username = %username, "login failed: {}", e);
            audit::record(
                data.db(),
                AuditEntry {
                    operation: "LOGIN",
                    resource_type: "USER",
                    resource_id: Some(username.clone()),
                    operator: &username,
                    source_ip,
                    result: audit::RESULT_FAILURE,
                    error_message: Some(e.to_string()),
                    details: None,
                },
            )
            .await;
            return HttpResponse::Forbidden().body(USER_NOT_FOUND_MESSAGE);
        }
    };

    let token_ttl = data.configuration.auth_token_expire_seconds();
    let token = match encode_jwt_token(
        &user.username,
        &user.role,
        &data.configuration.token_secret_key(),
        token_ttl,
    ) {
        Ok(token) => token,
        Err(e) => {
            tracing::error!("failed to encode token: {}", e);
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "code": 500,
                "message": "Failed to issue access token",
                "data": null
            }));
        }
    };

    audit::record(
        data.db(),
        AuditEntry {
            operation: "LOGIN",
            resource_type: "USER",
            resource_id: Some(user.username.clone()),
            operator: &user.username,
            source_ip,
            result: audit::RESULT_SUCCESS,
            error_message: None,
            details: None,
        },
    )
    .await;

    HttpResponse::Ok().json(LoginResult {
        access_token: token,
        token_ttl,
        role: user.role,
        username: user.username,
    })
}

#[post("/user")]
async fn register(
    req: HttpRequest,
    data: web::Data<AppState>,
    params: web::Form<RegisterForm>,
) -> impl Responder {
    if validation::validate_username(&params.username).is_err() {
        return common::ApiException::handle_illegal_argument_exception(
            "username is empty or contains invalid characters".to_string(),
        );
    }
    if validation::validate_password(&params.password).is_err() {
        return common::ApiException::handle_illegal_argument_exception(
            "password length out of bounds".to_string(),
        );
    }
    if params.email.is_empty() || !params.email.contains('@') {
        return common::ApiException::handle_illegal_argument_exception(
            "email is not valid".to_string(),
        );
    }

    // Self-service registration covers students and instructors; admin
    // accounts are provisioned out of band.
    let role = params.role.clone().unwrap_or(ROLE_STUDENT.to_string());
    if role != ROLE_STUDENT && role != ROLE_INSTRUCTOR {
        return common::ApiException::handle_illegal_argument_exception(format!(
            "cannot self-register with role '{}'",
            role
        ));
    }

    let display_name = if params.display_name.is_empty() {
        params.username.clone()
    } else {
        params.display_name.clone()
    };

    let result = masar_auth::service::user::create(
        data.db(),
        &params.username,
        &params.password,
        &params.email,
        &display_name,
        &role,
    )
    .await;

    match result {
        Ok(user) => {
            audit::record(
                data.db(),
                AuditEntry {
                    operation: "REGISTER",
                    resource_type: "USER",
                    resource_id: Some(user.username.clone()),
                    operator: &user.username,
                    source_ip: req.peer_addr().map(|a| a.ip().to_string()),
                    result: audit::RESULT_SUCCESS,
                    error_message: None,
                    details: Some(format!("{{\"role\":\"{}\"}}", role)),
                },
            )
            .await;
            common::Result::http_success("create user ok!")
        }
        Err(err) => common::ApiException::handle_exception(req.path(), err),
    }
}

#[put("/user/password")]
async fn update_password(
    req: HttpRequest,
    data: web::Data<AppState>,
    params: web::Form<UpdatePasswordForm>,
) -> impl Responder {
    let current_user = secured!(Secured::builder(&req, &data).build());

    if validation::validate_password(&params.new_password).is_err() {
        return common::ApiException::handle_illegal_argument_exception(
            "new password length out of bounds".to_string(),
        );
    }

    // Re-check the old password before accepting the change.
    if masar_auth::service::user::authenticate(
        data.db(),
        &current_user.username,
        &params.old_password,
    )
    .await
    .is_err()
    {
        return HttpResponse::Forbidden().body(USER_NOT_FOUND_MESSAGE);
    }

    let result = masar_auth::service::user::update_password(
        data.db(),
        &current_user.username,
        &params.new_password,
    )
    .await;

    match result {
        Ok(()) => common::Result::http_success("update password ok!"),
        Err(err) => common::ApiException::handle_exception(req.path(), err),
    }
}
