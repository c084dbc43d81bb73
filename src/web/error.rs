//! JSON error responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::dropbox::DropboxError;
use crate::storage::StorageError;

/// Message returned when no access token was configured at startup.
pub const NOT_INITIALIZED: &str = "Dropbox service is not initialized. Check the access token.";

/// API error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Bad request (400).
    BadRequest,
    /// Not found (404).
    NotFound,
    /// Conflict (409).
    Conflict,
    /// Payload too large (413).
    PayloadTooLarge,
    /// Too many requests upstream (429).
    RateLimited,
    /// Internal server error (500).
    InternalError,
    /// Dropbox is not configured (500).
    ServiceNotInitialized,
    /// Dropbox failed or rejected the call (502).
    BadGateway,
}

impl ErrorCode {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ErrorCode::BadRequest => StatusCode::BAD_REQUEST,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::Conflict => StatusCode::CONFLICT,
            ErrorCode::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ErrorCode::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ErrorCode::InternalError | ErrorCode::ServiceNotInitialized => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ErrorCode::BadGateway => StatusCode::BAD_GATEWAY,
        }
    }
}

/// API error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Error details.
    pub error: ErrorDetail,
}

/// Error detail.
#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    /// Error code.
    pub code: ErrorCode,
    /// Human-readable message.
    pub message: String,
}

/// API error type.
#[derive(Debug)]
pub struct ApiError {
    code: ErrorCode,
    message: String,
}

impl ApiError {
    /// Create a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Create a bad request error.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::BadRequest, message)
    }

    /// Create a payload too large error.
    pub fn payload_too_large(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::PayloadTooLarge, message)
    }

    /// Create an internal server error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// The error returned by data routes when no adapter exists.
    pub fn not_initialized() -> Self {
        Self::new(ErrorCode::ServiceNotInitialized, NOT_INITIALIZED)
    }

    /// Error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human-readable message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// HTTP status of this error.
    pub fn status(&self) -> StatusCode {
        self.code.status_code()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.code.status_code();
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
            },
        };
        (status, Json(body)).into_response()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        let code = match &err {
            StorageError::Deleted(_) => ErrorCode::NotFound,
            StorageError::Remote(e) | StorageError::Search(e) => match e {
                DropboxError::NotFound(_) => ErrorCode::NotFound,
                DropboxError::Conflict { .. } => ErrorCode::Conflict,
                DropboxError::RateLimited(_) => ErrorCode::RateLimited,
                DropboxError::Auth(_)
                | DropboxError::Api { .. }
                | DropboxError::Connection(_)
                | DropboxError::Decode(_) => ErrorCode::BadGateway,
            },
        };
        ApiError::new(code, err.to_string())
    }
}

impl From<crate::AppError> for ApiError {
    fn from(err: crate::AppError) -> Self {
        tracing::error!("Internal error: {}", err);
        ApiError::internal("An internal error occurred")
    }
}
