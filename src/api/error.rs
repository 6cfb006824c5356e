use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::fmt;

use super::ApiResponse;
use crate::services::{AdminError, AuthError, ImportError, PersonError};

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),

    DatabaseError(String),

    ValidationError {
        field: Option<String>,
        message: String,
    },

    Conflict(String),

    Forbidden(String),

    PasswordChangeRequired,

    InternalError(String),

    Unauthorized(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            ApiError::ValidationError { message, .. } => {
                write!(f, "Validation error: {}", message)
            }
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            ApiError::PasswordChangeRequired => write!(f, "Password change required"),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message, field) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, None),
            ApiError::DatabaseError(msg) => {
                tracing::error!("Database error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "A database error occurred".to_string(),
                    None,
                )
            }
            ApiError::ValidationError { field, message } => {
                (StatusCode::BAD_REQUEST, message, field)
            }
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg, None),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg, None),
            ApiError::PasswordChangeRequired => (
                StatusCode::FORBIDDEN,
                "You must change your password before continuing.".to_string(),
                None,
            ),
            ApiError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                    None,
                )
            }
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg, None),
        };

        let body = ApiResponse::<()>::error_for_field(error_message, field);
        (status, Json(body)).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::InternalError(err.to_string())
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => {
                ApiError::Unauthorized("Invalid credentials".to_string())
            }
            AuthError::UserNotFound => ApiError::Unauthorized("User not found".to_string()),
            AuthError::CurrentPasswordMismatch => {
                ApiError::validation_field("current_password", "Current password is incorrect")
            }
            AuthError::Validation(msg) => ApiError::validation_field("new_password", msg),
            AuthError::Database(msg) => ApiError::DatabaseError(msg),
            AuthError::Internal(msg) => ApiError::InternalError(msg),
        }
    }
}

impl From<AdminError> for ApiError {
    fn from(err: AdminError) -> Self {
        match err {
            AdminError::UserNotFound => ApiError::NotFound("User not found".to_string()),
            AdminError::DuplicateUsername => {
                ApiError::Conflict("A user with that username already exists".to_string())
            }
            AdminError::Forbidden(msg) => ApiError::Forbidden(msg),
            AdminError::Validation { field, message } => ApiError::ValidationError {
                field: Some(field),
                message,
            },
            AdminError::Database(msg) => ApiError::DatabaseError(msg),
            AdminError::Internal(msg) => ApiError::InternalError(msg),
        }
    }
}

impl From<PersonError> for ApiError {
    fn from(err: PersonError) -> Self {
        match err {
            PersonError::PersonNotFound => ApiError::NotFound("Person not found".to_string()),
            PersonError::DuplicateName(name) => {
                ApiError::Conflict(format!("A person with the name {name} already exists"))
            }
            PersonError::Validation { field, message } => ApiError::ValidationError {
                field: Some(field),
                message,
            },
            PersonError::Database(msg) => ApiError::DatabaseError(msg),
            PersonError::Internal(msg) => ApiError::InternalError(msg),
        }
    }
}

impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::Validation(msg) => ApiError::ValidationError {
                field: None,
                message: msg,
            },
            ImportError::Database(e) => ApiError::DatabaseError(e.to_string()),
            ImportError::Internal(msg) => ApiError::InternalError(msg),
        }
    }
}

impl ApiError {
    pub fn not_found(resource: &str, id: impl fmt::Display) -> Self {
        ApiError::NotFound(format!("{} {} not found", resource, id))
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        ApiError::ValidationError {
            field: None,
            message: msg.into(),
        }
    }

    pub fn validation_field(field: impl Into<String>, msg: impl Into<String>) -> Self {
        ApiError::ValidationError {
            field: Some(field.into()),
            message: msg.into(),
        }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        ApiError::InternalError(msg.into())
    }
}
