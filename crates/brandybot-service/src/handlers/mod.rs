//! API handlers.
//!
//! Every success body is wrapped in [`Envelope`]; errors go through
//! [`ApiError`](crate::error::ApiError).

pub mod auth;
pub mod brands;
pub mod chat;
pub mod health;
pub mod logos;
pub mod mockups;
pub mod users;
pub mod utils;

use std::str::FromStr;

use axum::extract::FromRequest;
use axum::http::Uri;
use serde::Serialize;

use crate::error::{ApiError, INVALID_ID};

/// Success response envelope.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    /// Always `true`.
    pub success: bool,
    /// Number of items in `data`, for list responses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    /// Paging details, for paged responses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
    /// Payload.
    pub data: T,
}

impl<T> Envelope<T> {
    /// Wrap a single payload.
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            count: None,
            pagination: None,
            data,
        }
    }
}

impl<T> Envelope<Vec<T>> {
    /// Wrap a list, recording its length.
    pub fn list(data: Vec<T>) -> Self {
        Self {
            success: true,
            count: Some(data.len()),
            pagination: None,
            data,
        }
    }

    /// Wrap one page of a list.
    #[must_use]
    pub fn paged(data: Vec<T>, pagination: Pagination) -> Self {
        Self {
            pagination: Some(pagination),
            ..Self::list(data)
        }
    }
}

/// Paging details.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    /// 1-based page number.
    pub page: u64,
    /// Page size.
    pub limit: u64,
    /// Total matching records.
    pub total: u64,
    /// Number of pages.
    pub pages: u64,
}

impl Pagination {
    /// Paging details for `total` records.
    #[must_use]
    pub fn new(page: u64, limit: u64, total: u64) -> Self {
        Self {
            page,
            limit,
            total,
            pages: if limit == 0 { 0 } else { total.div_ceil(limit) },
        }
    }
}

/// A plain `{ message }` payload.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    /// Message.
    pub message: String,
}

/// JSON body extractor whose rejections use the error envelope.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Parse a path identifier, rejecting malformed values with 400.
pub(crate) fn parse_id<T: FromStr>(raw: &str) -> Result<T, ApiError> {
    raw.parse().map_err(|_| ApiError::BadRequest(INVALID_ID.into()))
}

/// Fallback for unknown routes.
pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(format!("Not Found - {uri}"))
}
