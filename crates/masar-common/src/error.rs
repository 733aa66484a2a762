//! Error types and error codes for Masar
//!
//! This module defines:
//! - `MasarError`: Application-specific error enum
//! - `AppError`: Wrapper for integration with web frameworks
//! - `ErrorCode`: Structured error codes for API responses

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Application-specific error types
#[derive(thiserror::Error, Debug)]
pub enum MasarError {
    #[error("caused: {0}")]
    IllegalArgument(String),

    #[error("user '{0}' not exist!")]
    UserNotExist(String),

    #[error("user '{0}' already exist!")]
    UserAlreadyExist(String),

    #[error("authentication error: {0}")]
    AuthError(String),

    #[error("database error: {0}")]
    DatabaseError(String),

    #[error("configuration error: {0}")]
    ConfigError(String),

    #[error("internal error: {0}")]
    InternalError(String),

    #[error("course '{0}' not exist")]
    CourseNotExist(i64),

    #[error("track '{0}' not exist")]
    TrackNotExist(i64),

    #[error("module '{0}' not exist")]
    ModuleNotExist(i64),

    #[error("lesson '{0}' not exist")]
    LessonNotExist(i64),

    #[error("user '{0}' is not the owner of course '{1}'")]
    NotCourseOwner(i64, i64),

    #[error("student '{0}' already enrolled in '{1}'")]
    AlreadyEnrolled(i64, i64),

    #[error("student '{0}' is not enrolled in '{1}'")]
    NotEnrolled(i64, i64),

    #[error("course '{0}' still has active enrollments")]
    CourseHasEnrollments(i64),

    #[error("certificate '{0}' not exist")]
    CertificateNotExist(String),

    #[error("course '{0}' is not in a reviewable state")]
    InvalidCourseState(i64),
}

/// Wrapper for application errors
#[derive(Debug)]
pub struct AppError {
    inner: anyhow::Error,
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(value: anyhow::Error) -> Self {
        AppError { inner: value }
    }
}

impl AppError {
    pub fn inner(&self) -> &anyhow::Error {
        &self.inner
    }

    pub fn downcast_ref<E: std::error::Error + Send + Sync + 'static>(&self) -> Option<&E> {
        self.inner.downcast_ref::<E>()
    }
}

/// Error code structure for API responses
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ErrorCode<'a> {
    pub code: i32,
    pub message: &'a str,
}

// General success and error codes
pub const SUCCESS: ErrorCode<'static> = ErrorCode {
    code: 0,
    message: "success",
};

pub const PARAMETER_MISSING: ErrorCode<'static> = ErrorCode {
    code: 10000,
    message: "parameter missing",
};

pub const ACCESS_DENIED: ErrorCode<'static> = ErrorCode {
    code: 10001,
    message: "access denied",
};

pub const DATA_ACCESS_ERROR: ErrorCode<'static> = ErrorCode {
    code: 10002,
    message: "data access error",
};

pub const PARAMETER_VALIDATE_ERROR: ErrorCode<'static> = ErrorCode {
    code: 20002,
    message: "parameter validate error",
};

pub const RESOURCE_NOT_FOUND: ErrorCode<'static> = ErrorCode {
    code: 20004,
    message: "resource not found",
};

pub const RESOURCE_CONFLICT: ErrorCode<'static> = ErrorCode {
    code: 20005,
    message: "resource conflict",
};

// Catalog errors
pub const COURSE_NOT_EXIST: ErrorCode<'static> = ErrorCode {
    code: 21000,
    message: "course not exist",
};

pub const COURSE_ALREADY_EXIST: ErrorCode<'static> = ErrorCode {
    code: 21001,
    message: "course already exist",
};

pub const COURSE_DELETE_FAILURE: ErrorCode<'static> = ErrorCode {
    code: 21002,
    message: "course delete failure",
};

pub const LESSON_NOT_EXIST: ErrorCode<'static> = ErrorCode {
    code: 21003,
    message: "lesson not exist",
};

pub const TRACK_NOT_EXIST: ErrorCode<'static> = ErrorCode {
    code: 21004,
    message: "track not exist",
};

// Learning errors
pub const NOT_ENROLLED: ErrorCode<'static> = ErrorCode {
    code: 22000,
    message: "student not enrolled",
};

pub const ALREADY_ENROLLED: ErrorCode<'static> = ErrorCode {
    code: 22001,
    message: "student already enrolled",
};

pub const CERTIFICATE_NOT_FOUND: ErrorCode<'static> = ErrorCode {
    code: 22002,
    message: "certificate not found",
};

pub const SERVER_ERROR: ErrorCode<'static> = ErrorCode {
    code: 30000,
    message: "server error",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_masar_error_display() {
        let err = MasarError::IllegalArgument("invalid param".to_string());
        assert_eq!(format!("{}", err), "caused: invalid param");

        let err = MasarError::UserNotExist("ali".to_string());
        assert_eq!(format!("{}", err), "user 'ali' not exist!");

        let err = MasarError::AlreadyEnrolled(7, 42);
        assert_eq!(format!("{}", err), "student '7' already enrolled in '42'");

        let err = MasarError::NotCourseOwner(3, 9);
        assert_eq!(
            format!("{}", err),
            "user '3' is not the owner of course '9'"
        );
    }

    #[test]
    fn test_error_code_constants() {
        assert_eq!(SUCCESS.code, 0);
        assert_eq!(SUCCESS.message, "success");
        assert_eq!(PARAMETER_MISSING.code, 10000);
        assert_eq!(ACCESS_DENIED.code, 10001);
        assert_eq!(NOT_ENROLLED.code, 22000);
    }

    #[test]
    fn test_app_error_from_anyhow() {
        let anyhow_err = anyhow::anyhow!("test error");
        let app_err = AppError::from(anyhow_err);
        assert_eq!(format!("{}", app_err), "test error");
    }

    #[test]
    fn test_app_error_downcast() {
        let err: anyhow::Error = MasarError::LessonNotExist(5).into();
        let app_err = AppError::from(err);
        assert!(matches!(
            app_err.downcast_ref::<MasarError>(),
            Some(MasarError::LessonNotExist(5))
        ));
    }
}
