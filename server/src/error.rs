//! HTTP error responses.
//!
//! Bridges the domain error taxonomy to HTTP: every [`CoreError`] maps to a
//! status code plus a `{code, message}` JSON body, so clients can branch on
//! the stable code while humans read the message.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use seatwise_core::CoreError;
use serde::Serialize;
use std::fmt;

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: String,
    message: String,
}

impl ApiError {
    /// Create a new API error.
    #[must_use]
    pub const fn new(status: StatusCode, code: String, message: String) -> Self {
        Self {
            status,
            code,
            message,
        }
    }

    /// 401 Unauthorized.
    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::UNAUTHORIZED,
            "UNAUTHORIZED".to_string(),
            message.into(),
        )
    }

    /// 403 Forbidden.
    #[must_use]
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::FORBIDDEN,
            "FORBIDDEN".to_string(),
            message.into(),
        )
    }

    /// 400 Bad Request.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            "BAD_REQUEST".to_string(),
            message.into(),
        )
    }

    /// The HTTP status this error renders as.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

/// Error response body.
#[derive(Debug, Serialize)]
struct ErrorBody {
    /// Stable machine-readable code.
    code: String,
    /// Human-readable message.
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(
                status = %self.status,
                code = %self.code,
                message = %self.message,
                "request failed"
            );
        }

        let body = ErrorBody {
            code: self.code,
            message: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let status = match &err {
            CoreError::EventNotFound | CoreError::BookingNotFound | CoreError::UserNotFound => {
                StatusCode::NOT_FOUND
            }
            CoreError::InvalidInput { .. }
            | CoreError::InvalidSeatCount { .. }
            | CoreError::EventEnded
            | CoreError::InsufficientCapacity { .. }
            | CoreError::CapacityImmutable => StatusCode::BAD_REQUEST,
            CoreError::AlreadyCancelled | CoreError::EmailTaken => StatusCode::CONFLICT,
            CoreError::Forbidden => StatusCode::FORBIDDEN,
            CoreError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Storage details stay in the log, not in the response.
        let message = if matches!(err, CoreError::Storage(_)) {
            tracing::error!(error = %err, "storage failure");
            "An internal error occurred".to_string()
        } else {
            err.to_string()
        };

        Self::new(status, err.code().to_string(), message)
    }
}
