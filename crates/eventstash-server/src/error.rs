//! # API Error Types
//!
//! Maps cache outcomes to HTTP status codes with a JSON body
//! `{"error": {"code": .., "message": ..}}`.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use eventstash_core::CacheError;
use eventstash_core::domain::{ErrorKind, ValidationError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Machine-readable code, e.g. `NOT_FOUND`.
    pub code: String,
    pub message: String,
}

#[derive(Error, Debug)]
pub enum ApiError {
    /// 400: malformed path parameters.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// 401: missing or unknown bearer token.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// 403: ownership mismatch.
    #[error("{0}")]
    Forbidden(String),

    /// 404
    #[error("not found")]
    NotFound,

    /// 413
    #[error("{0}")]
    PayloadTooLarge(String),

    /// 503: the backing store failed. The store's message is passed through.
    #[error("{0}")]
    ServiceUnavailable(String),
}

impl ApiError {
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            Self::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            Self::Forbidden(_) => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            Self::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::PayloadTooLarge(_) => (StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE"),
            Self::ServiceUnavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, "SERVICE_UNAVAILABLE"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
            },
        };
        (status, Json(body)).into_response()
    }
}

impl From<CacheError> for ApiError {
    fn from(err: CacheError) -> Self {
        match err.kind() {
            ErrorKind::Infrastructure => tracing::warn!(error = %err, "responding with service unavailable"),
            ErrorKind::Client => tracing::debug!(error = %err, "cache rejected request"),
        }
        match err {
            CacheError::NotFound => Self::NotFound,
            CacheError::Forbidden(reason) => Self::Forbidden(reason),
            too_large @ CacheError::TooLarge { .. } => Self::PayloadTooLarge(too_large.to_string()),
            CacheError::StoreUnavailable(detail) => Self::ServiceUnavailable(detail),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self::BadRequest(err.to_string())
    }
}
