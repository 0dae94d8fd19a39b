//! Health check handlers.

use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Root banner.
#[derive(Debug, Serialize)]
pub struct RootResponse {
    /// Service name.
    pub message: &'static str,
    /// API version.
    pub version: &'static str,
    /// Always "running".
    pub status: &'static str,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always "healthy".
    pub status: &'static str,
    /// Server time.
    pub timestamp: DateTime<Utc>,
}

/// Root endpoint.
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "BrandyBot API Server",
        version: "1.0.0",
        status: "running",
    })
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        timestamp: Utc::now(),
    })
}
