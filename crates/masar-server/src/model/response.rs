//! HTTP response types for Masar server
//!
//! This module provides common response structures for API responses.

use actix_web::{HttpResponse, HttpResponseBuilder, http::StatusCode};
use serde::{Deserialize, Serialize};

use masar_common::error::MasarError;

/// Generic result wrapper for API responses
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Result<T> {
    pub code: i32,
    pub message: String,
    pub data: T,
}

impl<T> Result<T> {
    pub fn new(code: i32, message: String, data: T) -> Self {
        Result::<T> {
            code,
            message,
            data,
        }
    }

    pub fn success(data: T) -> Result<T> {
        Result::<T> {
            code: 0,
            message: "success".to_string(),
            data,
        }
    }

    pub fn fail(message: String) -> Result<()> {
        Result::<()> {
            code: 500,
            message,
            data: (),
        }
    }

    pub fn http_success(data: T) -> HttpResponse
    where
        T: Serialize,
    {
        HttpResponse::Ok().json(Result::success(data))
    }

    pub fn http_response(
        status: u16,
        code: i32,
        message: String,
        data: impl Serialize,
    ) -> HttpResponse {
        HttpResponseBuilder::new(StatusCode::from_u16(status).unwrap_or_default())
            .json(Result::new(code, message, data))
    }
}

/// Error result for API error responses
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ErrorResult {
    pub timestamp: String,
    pub status: i32,
    pub error: String,
    pub message: String,
    pub path: String,
}

impl ErrorResult {
    pub fn new(status: i32, error: String, message: String, path: String) -> Self {
        ErrorResult {
            timestamp: chrono::Utc::now().to_rfc3339(),
            status,
            error,
            message,
            path,
        }
    }

    pub fn forbidden(message: &str, path: &str) -> Self {
        ErrorResult {
            timestamp: chrono::Utc::now().to_rfc3339(),
            status: StatusCode::FORBIDDEN.as_u16() as i32,
            error: StatusCode::FORBIDDEN
                .canonical_reason()
                .unwrap_or_default()
                .to_string(),
            message: message.to_string(),
            path: path.to_string(),
        }
    }

    pub fn http_response_forbidden(code: i32, message: &str, path: &str) -> HttpResponse {
        HttpResponse::Forbidden().json(ErrorResult::forbidden(
            format!("Code: {}, Message: {}", code, message).as_str(),
            path,
        ))
    }
}

/// Maps service-layer failures to HTTP responses
pub struct ApiException;

impl ApiException {
    pub fn handle_illegal_argument_exception(message: String) -> HttpResponse {
        HttpResponse::BadRequest().json(Result::<String> {
            code: 400,
            message: message.clone(),
            data: message,
        })
    }

    /// Translate a service error into a status code via its domain variant.
    pub fn handle_exception(path: &str, err: anyhow::Error) -> HttpResponse {
        let status = match err.downcast_ref::<MasarError>() {
            Some(
                MasarError::UserNotExist(_)
                | MasarError::CourseNotExist(_)
                | MasarError::TrackNotExist(_)
                | MasarError::ModuleNotExist(_)
                | MasarError::LessonNotExist(_)
                | MasarError::CertificateNotExist(_),
            ) => StatusCode::NOT_FOUND,
            Some(
                MasarError::IllegalArgument(_)
                | MasarError::UserAlreadyExist(_)
                | MasarError::AlreadyEnrolled(_, _)
                | MasarError::CourseHasEnrollments(_)
                | MasarError::InvalidCourseState(_),
            ) => StatusCode::BAD_REQUEST,
            Some(MasarError::NotCourseOwner(_, _) | MasarError::NotEnrolled(_, _)) => {
                StatusCode::FORBIDDEN
            }
            Some(MasarError::AuthError(_)) => StatusCode::UNAUTHORIZED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(path, "unhandled service error: {}", err);
        }

        HttpResponseBuilder::new(status).json(Result::<String> {
            code: status.as_u16() as i32,
            message: err.to_string(),
            data: err.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_success() {
        let result = Result::success("ok");
        assert_eq!(result.code, 0);
        assert_eq!(result.message, "success");
        assert_eq!(result.data, "ok");
    }

    #[test]
    fn test_result_fail() {
        let result = Result::<()>::fail("boom".to_string());
        assert_eq!(result.code, 500);
        assert_eq!(result.message, "boom");
    }

    #[test]
    fn test_error_result_forbidden() {
        let result = ErrorResult::forbidden("no access", "/masar/v3/instructor/course");
        assert_eq!(result.status, 403);
        assert_eq!(result.error, "Forbidden");
        assert_eq!(result.path, "/masar/v3/instructor/course");
    }

    #[actix_web::test]
    async fn test_handle_exception_status_mapping() {
        let cases: Vec<(anyhow::Error, StatusCode)> = vec![
            (MasarError::CourseNotExist(1).into(), StatusCode::NOT_FOUND),
            (
                MasarError::AlreadyEnrolled(1, 2).into(),
                StatusCode::BAD_REQUEST,
            ),
            (
                MasarError::NotCourseOwner(1, 2).into(),
                StatusCode::FORBIDDEN,
            ),
            (
                MasarError::AuthError("nope".to_string()).into(),
                StatusCode::UNAUTHORIZED,
            ),
            (anyhow::anyhow!("db down"), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, expected) in cases {
            let response = ApiException::handle_exception("/test", err);
            assert_eq!(response.status(), expected);
        }
    }
}
