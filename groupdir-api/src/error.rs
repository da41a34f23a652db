//! API error handling.
//!
//! Errors are answered in plain text so upstream failures reach the client
//! as the upstream's own status and reason phrase.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use groupdir_core::error::GroupError;

/// API error type.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// Not found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    /// Internal server error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// Status the error is answered with.
    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            self.message,
        )
            .into_response()
    }
}

impl From<GroupError> for ApiError {
    fn from(err: GroupError) -> Self {
        match &err {
            GroupError::NotFound(_) => ApiError::not_found(err.to_string()),
            GroupError::Config(_) | GroupError::Io(_) => {
                tracing::error!(error = %err, "Internal error");
                ApiError::internal("An internal error occurred")
            }
            _ => {
                tracing::warn!(error = %err, "Upstream error");
                let status =
                    StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::BAD_GATEWAY);
                ApiError::new(status, err.to_string())
            }
        }
    }
}
