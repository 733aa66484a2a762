//! Security context and authorization macro for API access control

use actix_web::{HttpRequest, web};

use crate::model::app_state::AppState;

// Re-export auth types referenced via $crate::security:: in the macro expansion
pub use masar_auth::model::AuthContext;
pub use masar_auth::service::role::role_satisfies;

/// Security context for API access control.
///
/// Built per handler invocation; the `secured!` macro evaluates it, early
/// returns a 401/403 on failure, and yields the authenticated user row on
/// success. With `masar.auth.enabled=false` the role requirement is waived
/// but a valid token is still required for identity.
#[derive(Clone)]
pub struct Secured<'a> {
    pub req: &'a HttpRequest,          // HTTP request reference
    pub data: &'a web::Data<AppState>, // Application state
    pub required_role: &'a str,        // Role required for the endpoint
}

impl<'a> Secured<'a> {
    pub fn builder(req: &'a HttpRequest, data: &'a web::Data<AppState>) -> SecuredBuilder<'a> {
        SecuredBuilder::new(req, data)
    }
}

#[derive(Clone)]
pub struct SecuredBuilder<'a> {
    req: &'a HttpRequest,
    data: &'a web::Data<AppState>,
    required_role: &'a str,
}

impl<'a> SecuredBuilder<'a> {
    pub fn new(req: &'a HttpRequest, data: &'a web::Data<AppState>) -> Self {
        SecuredBuilder::<'a> {
            req,
            data,
            required_role: "",
        }
    }

    pub fn role(mut self, required_role: &'a str) -> Self {
        self.required_role = required_role;
        self
    }

    pub fn build(self) -> Secured<'a> {
        Secured::<'a> {
            req: self.req,
            data: self.data,
            required_role: self.required_role,
        }
    }
}

/// Evaluate a [`Secured`] context and bind the authenticated user.
///
/// ```ignore
/// let current_user = secured!(Secured::builder(&req, &data).role(ROLE_INSTRUCTOR).build());
/// ```
#[macro_export]
macro_rules! secured {
    ($secured: expr) => {{
        let __secured = $secured;

        let __auth_context_opt: Option<$crate::security::AuthContext> = {
            actix_web::HttpMessage::extensions(__secured.req)
                .get::<$crate::security::AuthContext>()
                .cloned()
        };

        let __auth_context = match __auth_context_opt {
            None => {
                return $crate::model::response::ErrorResult::http_response_forbidden(
                    actix_web::http::StatusCode::UNAUTHORIZED.as_u16() as i32,
                    "no auth context found",
                    __secured.req.path(),
                );
            }
            Some(ref __auth_context) if !__auth_context.token_provided => {
                return $crate::model::response::ErrorResult::http_response_forbidden(
                    actix_web::http::StatusCode::UNAUTHORIZED.as_u16() as i32,
                    "no token provided",
                    __secured.req.path(),
                );
            }
            Some(ref __auth_context) if __auth_context.jwt_error.is_some() => {
                return $crate::model::response::ErrorResult::http_response_forbidden(
                    actix_web::http::StatusCode::UNAUTHORIZED.as_u16() as i32,
                    &__auth_context.jwt_error_string(),
                    __secured.req.path(),
                );
            }
            Some(__auth_context) => __auth_context,
        };

        let __user = match masar_auth::service::user::find_by_username(
            __secured.data.db(),
            &__auth_context.username,
        )
        .await
        {
            Ok(Some(__user)) => __user,
            Ok(None) => {
                return $crate::model::response::ErrorResult::http_response_forbidden(
                    actix_web::http::StatusCode::UNAUTHORIZED.as_u16() as i32,
                    "token subject no longer exists",
                    __secured.req.path(),
                );
            }
            Err(__e) => {
                tracing::error!("failed to load user for auth check: {}", __e);
                return actix_web::HttpResponse::InternalServerError().json(
                    serde_json::json!({
                        "code": 500,
                        "message": "Failed to load user from database",
                        "data": null
                    }),
                );
            }
        };

        if !__user.enabled {
            return $crate::model::response::ErrorResult::http_response_forbidden(
                actix_web::http::StatusCode::FORBIDDEN.as_u16() as i32,
                "account disabled",
                __secured.req.path(),
            );
        }

        let __auth_enabled = __secured.data.configuration.auth_enabled();
        if __auth_enabled
            && !__secured.required_role.is_empty()
            && !$crate::security::role_satisfies(&__user.role, __secured.required_role)
        {
            return $crate::model::response::ErrorResult::http_response_forbidden(
                actix_web::http::StatusCode::FORBIDDEN.as_u16() as i32,
                "authorization failed!",
                __secured.req.path(),
            );
        }

        __user
    }};
}
