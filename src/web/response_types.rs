//! # Web API Error Types
//!
//! Defines error types specific to the web API and their HTTP response conversions.
//! Leverages thiserror for structured error handling and Axum's IntoResponse for HTTP conversion.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

use crate::error::ChecklistError;
use crate::logging::log_error;

/// Web API specific errors with HTTP status code mappings
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Invalid request: {message}")]
    BadRequest { message: String },

    #[error("Service temporarily unavailable")]
    ServiceUnavailable,

    #[error("Database operation failed: {operation}")]
    DatabaseError { operation: String },

    #[error("Internal server error")]
    Internal,
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create a BadRequest error with a custom message
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    /// Create a DatabaseError with operation context
    pub fn database_error(operation: impl Into<String>) -> Self {
        Self::DatabaseError {
            operation: operation.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::DatabaseError { .. } | ApiError::Internal => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (error_code, message) = match &self {
            ApiError::NotFound { message } => ("NOT_FOUND", message.as_str()),

            ApiError::BadRequest { message } => ("BAD_REQUEST", message.as_str()),

            ApiError::ServiceUnavailable => {
                ("SERVICE_UNAVAILABLE", "Service temporarily unavailable")
            }

            ApiError::DatabaseError { operation } => ("DATABASE_ERROR", operation.as_str()),

            ApiError::Internal => ("INTERNAL_ERROR", "Internal server error"),
        };

        let error_response = json!({
            "error": {
                "code": error_code,
                "message": message
            }
        });

        (self.status_code(), Json(error_response)).into_response()
    }
}

/// Convert domain errors to API errors; server-side failures are logged and
/// reported with a generic message
impl From<ChecklistError> for ApiError {
    fn from(err: ChecklistError) -> Self {
        match err {
            ChecklistError::ChecklistNotFound { .. } => ApiError::not_found("Checklist not found"),
            ChecklistError::ItemNotFound { .. } => ApiError::not_found("Item not found"),
            ChecklistError::Validation(message) => ApiError::bad_request(message),
            ChecklistError::Database(db_error) => db_error.into(),
            other => {
                log_error("web", "request", &other.to_string(), None);
                ApiError::Internal
            }
        }
    }
}

/// Convert sqlx errors to API errors
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        log_error("web", "database", &err.to_string(), None);
        match err {
            sqlx::Error::PoolTimedOut => ApiError::ServiceUnavailable,
            _ => ApiError::database_error("Database operation failed"),
        }
    }
}

/// Malformed or missing JSON bodies are reported in the common error shape
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}

/// Body returned by delete and reorder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_domain_error_mapping() {
        let not_found: ApiError = ChecklistError::item_not_found(Uuid::new_v4()).into();
        assert_eq!(not_found.status_code(), StatusCode::NOT_FOUND);

        let invalid: ApiError = ChecklistError::validation("Title is required").into();
        assert_eq!(invalid.status_code(), StatusCode::BAD_REQUEST);

        let exhausted: ApiError = ChecklistError::HashSpaceExhausted { attempts: 3 }.into();
        assert_eq!(exhausted.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        let db: ApiError = ChecklistError::Database(sqlx::Error::RowNotFound).into();
        assert_eq!(db.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_internal_errors_do_not_leak_details() {
        let error: ApiError = ChecklistError::Configuration("secret dsn".to_string()).into();
        assert!(!error.to_string().contains("secret"));
    }
}
