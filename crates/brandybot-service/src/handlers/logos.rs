//! Logo generation and history handlers.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use brandybot_core::{BrandyError, LogoHistory, LogoId, LogoRequest, LogoStats, User};

use crate::ai::GeneratedImage;
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::handlers::{parse_id, ApiJson, Envelope, Pagination};
use crate::llm::BrandProfile;
use crate::state::AppState;

const DEFAULT_PAGE: u64 = 1;
const DEFAULT_LIMIT: u64 = 10;
const MAX_LIMIT: u64 = 100;

/// Logo generation request.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerateLogoRequest {
    /// Brand name.
    pub brand_name: Option<String>,
    /// Free-text description of the logo.
    pub prompt: Option<String>,
    /// Style name.
    pub style: Option<String>,
    /// Industry.
    pub industry: Option<String>,
    /// Preferred colours.
    pub colors: Vec<String>,
}

/// A finished generation plus the LLM's one-line summary.
#[derive(Debug, Serialize)]
pub struct GeneratedLogo {
    /// The stored record.
    #[serde(flatten)]
    pub logo: LogoHistory,
    /// Friendly confirmation, present when the prompt was engineered.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

/// Paging query. Unparseable or zero values fall back to the defaults.
#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    /// 1-based page.
    pub page: Option<String>,
    /// Page size.
    pub limit: Option<String>,
}

impl HistoryQuery {
    fn resolve(&self) -> (u64, u64) {
        let parse = |raw: &Option<String>, default: u64| {
            raw.as_deref()
                .and_then(|v| v.trim().parse::<u64>().ok())
                .filter(|v| *v > 0)
                .unwrap_or(default)
        };
        (
            parse(&self.page, DEFAULT_PAGE),
            parse(&self.limit, DEFAULT_LIMIT).min(MAX_LIMIT),
        )
    }
}

/// Rating request.
#[derive(Debug, Deserialize)]
pub struct RateRequest {
    /// 1 to 5.
    #[serde(default)]
    pub rating: Option<i64>,
}

/// Generate a logo through the AI service and record the attempt.
pub async fn generate(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    ApiJson(body): ApiJson<GenerateLogoRequest>,
) -> Result<Json<Envelope<GeneratedLogo>>, ApiError> {
    let (Some(brand_name), Some(prompt)) = (
        body.brand_name.filter(|s| !s.trim().is_empty()),
        body.prompt.filter(|s| !s.trim().is_empty()),
    ) else {
        return Err(ApiError::BadRequest(
            "Please provide brand name and prompt".into(),
        ));
    };

    let request = LogoRequest::new(
        &brand_name,
        &prompt,
        body.style.as_deref(),
        body.industry.as_deref(),
        body.colors,
    )?;

    let mut record = LogoHistory::processing(auth.user.id, &request);
    state.store.create_logo(&record).await?;

    tracing::info!(
        logo_id = %record.id,
        user_id = %auth.user.id,
        brand = %request.brand_name,
        "Logo generation started"
    );

    // Finishes and records the outcome even if the request is dropped.
    tokio::spawn(run_generation(state, request, record, auth.user))
        .await
        .map_err(|e| ApiError::Internal(format!("Logo generation task failed: {e}")))?
}

/// Call the LLM, AI service and image host, then record the outcome.
async fn run_generation(
    state: Arc<AppState>,
    request: LogoRequest,
    mut record: LogoHistory,
    mut user: User,
) -> Result<Json<Envelope<GeneratedLogo>>, ApiError> {
    let (image_prompt, negative_prompt, summary) = match &state.llm {
        Some(llm) => {
            let profile = BrandProfile {
                brand_name: request.brand_name.clone(),
                description: request.prompt.clone(),
                industry: request.industry.clone(),
                style: request.style.as_str().to_string(),
                colors: request.colors.clone(),
                ..BrandProfile::default()
            };
            let engineered = llm.engineer_prompt(&profile).await;
            (
                request.image_prompt_with(&engineered.sd_prompt),
                Some(engineered.negative_prompt),
                Some(engineered.summary),
            )
        }
        None => (request.image_prompt(), None, None),
    };

    let outcome = match state
        .ai
        .generate_logo(&image_prompt, negative_prompt.as_deref())
        .await
    {
        Ok(image) => host_image(&state, &image).await.map(|url| (url, image.byte_len)),
        Err(e) => Err(e.to_string()),
    };

    match outcome {
        Ok((url, byte_len)) => {
            record.complete(url, byte_len, &request.colors);
            state.store.update_logo(&record).await?;

            user.record_logo_generated();
            state.store.update_user(&user).await?;

            tracing::info!(logo_id = %record.id, size = byte_len, "Logo generation completed");

            Ok(Json(Envelope::new(GeneratedLogo {
                logo: record,
                summary,
            })))
        }
        Err(reason) => {
            tracing::error!(logo_id = %record.id, error = %reason, "Logo generation failed");
            record.fail(reason.clone());
            state.store.update_logo(&record).await?;
            Err(ApiError::GenerationFailed(format!(
                "Logo generation failed: {reason}"
            )))
        }
    }
}

/// Upload to the image host when configured, else inline as a data URL.
async fn host_image(state: &AppState, image: &GeneratedImage) -> Result<String, String> {
    match &state.imgbb {
        Some(imgbb) => imgbb
            .upload_base64(&image.base64)
            .await
            .map_err(|e| format!("Image upload failed: {e}")),
        None => Ok(image.data_url()),
    }
}

/// Page through the caller's history, newest first.
pub async fn history(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Envelope<Vec<LogoHistory>>>, ApiError> {
    let (page, limit) = query.resolve();
    let offset = (page - 1).saturating_mul(limit);

    let logos = state
        .store
        .list_logos(
            &auth.user.id,
            usize::try_from(limit).unwrap_or(usize::MAX),
            usize::try_from(offset).unwrap_or(usize::MAX),
        )
        .await?;
    let total = state.store.count_logos(&auth.user.id).await?;

    Ok(Json(Envelope::paged(
        logos,
        Pagination::new(page, limit, total),
    )))
}

/// Aggregate statistics over the caller's history.
pub async fn stats(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<Json<Envelope<LogoStats>>, ApiError> {
    let stats = state.store.logo_stats(&auth.user.id).await?;
    Ok(Json(Envelope::new(stats)))
}

/// One of the caller's logos.
pub async fn get(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Envelope<LogoHistory>>, ApiError> {
    let logo = owned_logo(&state, &auth, &id).await?;
    Ok(Json(Envelope::new(logo)))
}

/// Rate one of the caller's logos.
pub async fn rate(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<RateRequest>,
) -> Result<Json<Envelope<LogoHistory>>, ApiError> {
    let rating = body.rating.ok_or(BrandyError::InvalidRating)?;
    let mut logo = owned_logo(&state, &auth, &id).await?;
    logo.rate(rating)?;
    state.store.update_logo(&logo).await?;
    Ok(Json(Envelope::new(logo)))
}

/// Mark one of the caller's logos as downloaded.
pub async fn download(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Envelope<LogoHistory>>, ApiError> {
    let mut logo = owned_logo(&state, &auth, &id).await?;
    logo.mark_downloaded();
    state.store.update_logo(&logo).await?;
    Ok(Json(Envelope::new(logo)))
}

async fn owned_logo(state: &AppState, auth: &AuthUser, raw_id: &str) -> Result<LogoHistory, ApiError> {
    let id: LogoId = parse_id(raw_id)?;
    state
        .store
        .get_logo(&id, &auth.user.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Logo not found".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(page: Option<&str>, limit: Option<&str>) -> HistoryQuery {
        HistoryQuery {
            page: page.map(Into::into),
            limit: limit.map(Into::into),
        }
    }

    #[test]
    fn history_query_defaults() {
        assert_eq!(query(None, None).resolve(), (1, 10));
        assert_eq!(query(Some("0"), Some("abc")).resolve(), (1, 10));
        assert_eq!(query(Some("3"), Some("25")).resolve(), (3, 25));
        assert_eq!(query(None, Some("5000")).resolve(), (1, MAX_LIMIT));
    }
}
