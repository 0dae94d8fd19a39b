//! API error types and responses.

use axum::extract::rejection::{
    BytesRejection, FailedToBufferBody, JsonRejection, PathRejection, QueryRejection,
};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use brandybot_core::BrandyError;
use brandybot_store::StoreError;

/// Message returned when no bearer token is sent.
pub const NOT_LOGGED_IN: &str = "You are not logged in! Please log in to get access.";

/// Message returned when a bearer token fails verification.
pub const INVALID_TOKEN: &str = "Invalid or expired token. Please log in again.";

/// Message returned for malformed identifiers.
pub const INVALID_ID: &str = "Invalid ID format.";

/// API error type.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Unauthorized - missing or invalid credentials.
    #[error("unauthorized: {0}")]
    Unauthorized(&'static str),

    /// Resource not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Bad request - invalid input.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Conflict - a unique value is already taken.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Request body over the configured limit.
    #[error("payload too large: {0}")]
    PayloadTooLarge(String),

    /// The request did not finish within the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// Rate limit exhausted.
    #[error("too many requests: {0}")]
    TooManyRequests(&'static str),

    /// A generation call failed; the reason is shown to the caller.
    #[error("generation failed: {0}")]
    GenerationFailed(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),

    /// External service error.
    #[error("external service error: {0}")]
    ExternalService(String),

    /// A required integration is not configured.
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),
}

/// JSON error response body.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    success: bool,
    status: &'static str,
    code: &'static str,
    message: String,
}

impl ApiError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Timeout => StatusCode::REQUEST_TIMEOUT,
            Self::TooManyRequests(_) => StatusCode::TOO_MANY_REQUESTS,
            Self::GenerationFailed(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ExternalService(_) => StatusCode::BAD_GATEWAY,
            Self::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    const fn code(&self) -> &'static str {
        match self {
            Self::Unauthorized(_) => "unauthorized",
            Self::NotFound(_) => "not_found",
            Self::BadRequest(_) => "bad_request",
            Self::Conflict(_) => "conflict",
            Self::PayloadTooLarge(_) => "payload_too_large",
            Self::Timeout => "timeout",
            Self::TooManyRequests(_) => "rate_limited",
            Self::GenerationFailed(_) => "generation_failed",
            Self::Internal(_) => "internal_error",
            Self::ExternalService(_) => "external_service_error",
            Self::ServiceUnavailable(_) => "service_unavailable",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.code();
        let message = match self {
            Self::Unauthorized(msg) | Self::TooManyRequests(msg) => msg.to_string(),
            Self::Timeout => {
                tracing::warn!("Request timed out");
                "Request timed out. Please try again.".to_string()
            }
            Self::Internal(msg) => {
                tracing::error!(error = %msg, "Internal server error");
                "An internal error occurred".to_string()
            }
            Self::GenerationFailed(msg) => {
                tracing::error!(error = %msg, "Generation failed");
                msg
            }
            Self::ExternalService(msg) => {
                tracing::warn!(error = %msg, "External service error");
                msg
            }
            Self::NotFound(msg)
            | Self::BadRequest(msg)
            | Self::Conflict(msg)
            | Self::PayloadTooLarge(msg)
            | Self::ServiceUnavailable(msg) => msg,
        };

        let body = ErrorResponse {
            success: false,
            status: if status.is_server_error() { "error" } else { "fail" },
            code,
            message,
        };

        (status, Json(body)).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity, .. } => Self::NotFound(not_found_message(entity)),
            StoreError::Conflict(detail) => {
                tracing::debug!(%detail, "Unique constraint violated");
                Self::Conflict("A record with this value already exists.".into())
            }
            StoreError::InvalidReference(detail) => {
                tracing::debug!(%detail, "Foreign key violated");
                Self::BadRequest("Referenced record does not exist.".into())
            }
            StoreError::InvalidInput(detail) => {
                tracing::debug!(%detail, "Malformed value rejected by the database");
                Self::BadRequest(INVALID_ID.into())
            }
            StoreError::Database(msg) | StoreError::Serialization(msg) => Self::Internal(msg),
        }
    }
}

impl From<BrandyError> for ApiError {
    fn from(err: BrandyError) -> Self {
        match err {
            BrandyError::InvalidId(_) => Self::BadRequest(INVALID_ID.into()),
            other => Self::BadRequest(other.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::BytesRejection(BytesRejection::FailedToBufferBody(
                FailedToBufferBody::LengthLimitError(_),
            )) => Self::PayloadTooLarge("Request body is too large.".into()),
            other => Self::BadRequest(other.body_text()),
        }
    }
}

impl From<PathRejection> for ApiError {
    fn from(_: PathRejection) -> Self {
        Self::BadRequest(INVALID_ID.into())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

/// "Brand not found" style message for a store entity name.
#[must_use]
pub fn not_found_message(entity: &str) -> String {
    let mut chars = entity.chars();
    match chars.next() {
        Some(first) => format!("{}{} not found", first.to_uppercase(), chars.as_str()),
        None => "Not found".to_string(),
    }
}
