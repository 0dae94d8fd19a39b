//! Brand handlers.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use brandybot_core::{
    Brand, BrandId, BrandStatus, BrandUpdate, GeneratedGuidelines, NewBrand, PLACEHOLDER_LOGO_URL,
};

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::handlers::{parse_id, ApiJson, Envelope};
use crate::llm::BrandProfile;
use crate::state::AppState;

const BRAND_NOT_FOUND: &str = "Brand not found";

/// Brand list filter.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    /// `draft`, `active` or `archived`; defaults to `active`.
    pub status: Option<String>,
}

/// Share response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareResponse {
    /// Public share token.
    pub share_link: String,
    /// Always `true`.
    pub is_public: bool,
}

/// Create a brand owned by the caller.
pub async fn create(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    ApiJson(body): ApiJson<NewBrand>,
) -> Result<(StatusCode, Json<Envelope<Brand>>), ApiError> {
    let brand = Brand::new(auth.user.id, body)?;
    state.store.create_brand(&brand).await?;

    let mut user = auth.user;
    user.record_brand_created();
    state.store.update_user(&user).await?;

    tracing::info!(brand_id = %brand.id, user_id = %user.id, "Brand created");

    Ok((StatusCode::CREATED, Json(Envelope::new(brand))))
}

/// List the caller's brands with the requested status.
pub async fn list(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Query(query): Query<ListQuery>,
) -> Result<Json<Envelope<Vec<Brand>>>, ApiError> {
    let status = match query.status.as_deref().map(str::trim) {
        None | Some("") => BrandStatus::default(),
        Some(raw) => raw.parse().map_err(ApiError::BadRequest)?,
    };
    let brands = state.store.list_brands(&auth.user.id, Some(status)).await?;
    Ok(Json(Envelope::list(brands)))
}

/// One of the caller's brands.
pub async fn get(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Envelope<Brand>>, ApiError> {
    let brand = owned_brand(&state, &auth, &id).await?;
    Ok(Json(Envelope::new(brand)))
}

/// Update one of the caller's brands.
pub async fn update(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<BrandUpdate>,
) -> Result<Json<Envelope<Brand>>, ApiError> {
    let mut brand = owned_brand(&state, &auth, &id).await?;
    brand.apply(body, auth.user.id)?;
    state.store.update_brand(&brand).await?;

    tracing::debug!(brand_id = %brand.id, version = brand.version, "Brand updated");

    Ok(Json(Envelope::new(brand)))
}

/// Delete one of the caller's brands.
pub async fn delete(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Envelope<serde_json::Value>>, ApiError> {
    let id: BrandId = parse_id(&id)?;
    state.store.delete_brand(&id, &auth.user.id).await?;

    tracing::info!(brand_id = %id, user_id = %auth.user.id, "Brand deleted");

    Ok(Json(Envelope::new(serde_json::json!({}))))
}

/// Publish one of the caller's brands under a fresh share token.
pub async fn share(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Envelope<ShareResponse>>, ApiError> {
    let mut brand = owned_brand(&state, &auth, &id).await?;
    let share_link = brand.publish().to_string();
    state.store.update_brand(&brand).await?;

    Ok(Json(Envelope::new(ShareResponse {
        share_link,
        is_public: brand.is_public,
    })))
}

/// Archive one of the caller's brands.
pub async fn archive(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Envelope<Brand>>, ApiError> {
    set_status(&state, &auth, &id, BrandStatus::Archived).await
}

/// Reactivate one of the caller's brands.
pub async fn activate(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Envelope<Brand>>, ApiError> {
    set_status(&state, &auth, &id, BrandStatus::Active).await
}

async fn set_status(
    state: &AppState,
    auth: &AuthUser,
    id: &str,
    status: BrandStatus,
) -> Result<Json<Envelope<Brand>>, ApiError> {
    let mut brand = owned_brand(state, auth, id).await?;
    brand.set_status(status, auth.user.id);
    state.store.update_brand(&brand).await?;

    tracing::info!(brand_id = %brand.id, status = status.as_str(), "Brand status changed");

    Ok(Json(Envelope::new(brand)))
}

/// A published brand, no authentication required.
pub async fn public(
    State(state): State<Arc<AppState>>,
    Path(share_link): Path<String>,
) -> Result<Json<Envelope<Brand>>, ApiError> {
    let brand = state
        .store
        .get_public_brand(&share_link)
        .await?
        .ok_or_else(|| ApiError::NotFound("Brand not found or link expired".into()))?;
    Ok(Json(Envelope::new(brand)))
}

/// Generate a guideline document from a brand profile without storing it.
pub async fn generate_guidelines(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    ApiJson(profile): ApiJson<BrandProfile>,
) -> Result<Json<Envelope<GeneratedGuidelines>>, ApiError> {
    if profile.brand_name.trim().is_empty() {
        return Err(ApiError::BadRequest("Brand name is required".into()));
    }
    let guidelines = guidelines_for(&state, &profile).await?;
    Ok(Json(Envelope::new(guidelines)))
}

/// Generate and store guidelines for one of the caller's brands.
pub async fn regenerate_guidelines(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Envelope<Brand>>, ApiError> {
    let mut brand = owned_brand(&state, &auth, &id).await?;

    let generated = guidelines_for(&state, &profile_of(&brand)).await?;
    brand.set_guidelines(generated.into_guidelines(), auth.user.id);
    state.store.update_brand(&brand).await?;

    tracing::info!(brand_id = %brand.id, version = brand.version, "Brand guidelines generated");

    Ok(Json(Envelope::new(brand)))
}

async fn guidelines_for(
    state: &AppState,
    profile: &BrandProfile,
) -> Result<GeneratedGuidelines, ApiError> {
    let llm = state.llm.as_ref().ok_or_else(|| {
        ApiError::ServiceUnavailable("Guideline generation is not configured".into())
    })?;
    llm.generate_guidelines(profile).await.map_err(|e| {
        tracing::error!(error = %e, brand = %profile.brand_name, "Guideline generation failed");
        ApiError::GenerationFailed(format!("Failed to generate brand guidelines: {e}"))
    })
}

/// Profile of a stored brand, carrying its current palette as colour hints.
fn profile_of(brand: &Brand) -> BrandProfile {
    let palette = &brand.guidelines.colors;
    let colors = [&palette.primary, &palette.secondary, &palette.accent]
        .into_iter()
        .flatten()
        .map(|c| c.hex.clone())
        .collect();
    let logo_url = Some(brand.logo.primary_logo_url.as_str())
        .filter(|url| *url != PLACEHOLDER_LOGO_URL)
        .unwrap_or_default()
        .to_string();

    BrandProfile {
        brand_name: brand.brand_name.clone(),
        tagline: brand.tagline.clone(),
        description: brand.description.clone(),
        industry: brand.industry.clone(),
        target_audience: brand.target_audience.clone(),
        personality: brand.guidelines.voice.personality.join(", "),
        colors,
        logo_url,
        ..BrandProfile::default()
    }
}

async fn owned_brand(state: &AppState, auth: &AuthUser, raw_id: &str) -> Result<Brand, ApiError> {
    let id: BrandId = parse_id(raw_id)?;
    state
        .store
        .get_brand(&id, &auth.user.id)
        .await?
        .ok_or_else(|| ApiError::NotFound(BRAND_NOT_FOUND.into()))
}
