//! Dev server error types
//!
//! Converts errors into HTTP responses with appropriate status codes.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DevServerError {
    /// Request validation failed
    #[error("Validation error: {0}")]
    Validation(String),

    /// Unknown session
    #[error("Not found: {0}")]
    NotFound(String),

    /// Auth token does not match the session
    #[error("Invalid auth token")]
    Forbidden,

    /// Session no longer accepts this update
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error response body
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
    pub request_id: String,
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

impl IntoResponse for DevServerError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            DevServerError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            DevServerError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            DevServerError::Forbidden => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            DevServerError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            DevServerError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            DevServerError::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "IO_ERROR"),
        };

        let request_id = uuid::Uuid::new_v4().to_string();

        tracing::warn!(
            request_id = %request_id,
            error_code = %code,
            error_message = %self,
            "Request rejected"
        );

        let body = ErrorResponse {
            error: ErrorBody {
                code: code.to_string(),
                message: self.to_string(),
            },
            request_id,
        };

        (status, Json(body)).into_response()
    }
}

pub type DevServerResult<T> = Result<T, DevServerError>;
