//! Image utility handlers.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::handlers::{ApiJson, Envelope};
use crate::state::AppState;

const REMOVE_BG_FAILED: &str =
    "Failed to remove background. The API may be out of credits or the image is invalid.";

/// Background removal request.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RemoveBgRequest {
    /// Image to process.
    pub image_url: Option<String>,
}

/// Background removal result.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveBgResult {
    /// Hosted transparent PNG.
    pub transparent_url: String,
}

/// Remove an image's background and re-host the transparent PNG.
pub async fn remove_bg(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    ApiJson(body): ApiJson<RemoveBgRequest>,
) -> Result<Json<Envelope<RemoveBgResult>>, ApiError> {
    let image_url = body
        .image_url
        .filter(|u| !u.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("Image URL is required".into()))?;

    let remove_bg = state.remove_bg.as_ref().ok_or_else(|| {
        ApiError::ServiceUnavailable("Remove.bg API key not configured".into())
    })?;
    let imgbb = state
        .imgbb
        .as_ref()
        .ok_or_else(|| ApiError::ServiceUnavailable("ImgBB API key not configured".into()))?;

    tracing::info!(user_id = %auth.user.id, image_url = %image_url, "Removing background");

    let png = remove_bg.remove_background(&image_url).await.map_err(|e| {
        tracing::error!(error = %e, "Background removal failed");
        ApiError::ExternalService(REMOVE_BG_FAILED.into())
    })?;

    let transparent_url = imgbb.upload_bytes(&png).await.map_err(|e| {
        tracing::error!(error = %e, "Transparent image upload failed");
        ApiError::ExternalService(REMOVE_BG_FAILED.into())
    })?;

    tracing::info!(transparent_url = %transparent_url, "Background removed");

    Ok(Json(Envelope::new(RemoveBgResult { transparent_url })))
}
