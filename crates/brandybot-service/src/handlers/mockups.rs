//! Mockup handlers.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use brandybot_core::mockup::templates as template_catalogue;
use brandybot_core::{BrandId, MockupKind, MockupTemplate};

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::handlers::{parse_id, ApiJson, Envelope};
use crate::state::AppState;

/// Mockup generation request.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerateMockupRequest {
    /// Logo to apply.
    pub logo_url: Option<String>,
    /// Template id.
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Brand to record the mockup on.
    pub brand_id: Option<String>,
}

/// Generated mockup.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MockupResult {
    /// Rendered mockup URL.
    pub mockup_url: String,
    /// Template used.
    #[serde(rename = "type")]
    pub kind: MockupKind,
}

/// Render a logo onto a product template.
pub async fn generate(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    ApiJson(body): ApiJson<GenerateMockupRequest>,
) -> Result<Json<Envelope<MockupResult>>, ApiError> {
    let (Some(logo_url), Some(kind)) = (
        body.logo_url.filter(|s| !s.trim().is_empty()),
        body.kind.filter(|s| !s.trim().is_empty()),
    ) else {
        return Err(ApiError::BadRequest(
            "Please provide logoUrl and mockup type".into(),
        ));
    };
    let kind: MockupKind = kind.trim().parse()?;

    // Resolve the brand first so a bad id does not cost a render.
    let brand = match body.brand_id.as_deref().filter(|s| !s.trim().is_empty()) {
        Some(raw) => {
            let id: BrandId = parse_id(raw.trim())?;
            let brand = state
                .store
                .get_brand(&id, &auth.user.id)
                .await?
                .ok_or_else(|| ApiError::NotFound("Brand not found".into()))?;
            Some(brand)
        }
        None => None,
    };

    let mockup_url = state
        .ai
        .generate_mockup(&logo_url, kind.id())
        .await
        .map_err(|e| {
            tracing::error!(kind = %kind, error = %e, "Mockup generation failed");
            ApiError::GenerationFailed(format!("Mockup generation failed: {e}"))
        })?;

    if let Some(mut brand) = brand {
        brand.record_mockup(kind, mockup_url.clone(), auth.user.id);
        state.store.update_brand(&brand).await?;
        tracing::info!(brand_id = %brand.id, kind = %kind, "Mockup recorded on brand");
    }

    Ok(Json(Envelope::new(MockupResult { mockup_url, kind })))
}

/// The template catalogue.
pub async fn templates(_auth: AuthUser) -> Json<Envelope<Vec<MockupTemplate>>> {
    Json(Envelope::list(template_catalogue()))
}
