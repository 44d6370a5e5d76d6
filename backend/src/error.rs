//! Error handling for the vendor management server
//!
//! Every failure leaves the server through `AppError::into_response`, so
//! status codes and response bodies are decided in one place.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use shared::ValidationErrors;
use thiserror::Error;

pub const MSG_EMAIL_TAKEN: &str = "Email already in use for another Vendor";
pub const MSG_INVALID_CREDENTIALS: &str = "Invalid credentials";
pub const MSG_INTERNAL: &str = "Internal Server Error";

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Validation errors
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("{}", MSG_EMAIL_TAKEN)]
    EmailTaken,

    #[error("Resource not found: {0}")]
    NotFound(String),

    // Authentication errors
    #[error("{}", MSG_INVALID_CREDENTIALS)]
    InvalidCredentials,

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    // Infrastructure errors
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Internal server error")]
    InternalError(#[from] anyhow::Error),
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::Validation(errors)
    }
}

/// Body for every non-validation error
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            details: None,
        }
    }
}

/// Body for rejected payloads
#[derive(Debug, Serialize)]
pub struct ValidationErrorResponse {
    pub errors: ValidationErrors,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::BadRequest(_) | AppError::EmailTaken | AppError::InvalidCredentials => {
                StatusCode::BAD_REQUEST
            }
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Storage(_)
            | AppError::DatabaseError(_)
            | AppError::Internal(_)
            | AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match &self {
            AppError::Validation(errors) => {
                tracing::debug!("Rejected payload: {}", errors);
                return (
                    status,
                    Json(ValidationErrorResponse {
                        errors: errors.clone(),
                    }),
                )
                    .into_response();
            }
            AppError::BadRequest(msg) | AppError::NotFound(msg) | AppError::Unauthorized(msg) => {
                ErrorResponse::new(msg.clone())
            }
            AppError::EmailTaken => ErrorResponse::new(MSG_EMAIL_TAKEN),
            AppError::InvalidCredentials => ErrorResponse::new(MSG_INVALID_CREDENTIALS),
            AppError::DatabaseError(sqlx::Error::Database(db)) => {
                // Expose the constraint name only; never SQL or row data
                tracing::error!("Error: {:?}", self);
                ErrorResponse {
                    message: MSG_INTERNAL.to_string(),
                    details: db
                        .constraint()
                        .map(|c| serde_json::json!({ "constraint": c })),
                }
            }
            AppError::Storage(_)
            | AppError::DatabaseError(_)
            | AppError::Internal(_)
            | AppError::InternalError(_) => {
                tracing::error!("Error: {:?}", self);
                ErrorResponse::new(MSG_INTERNAL)
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;
