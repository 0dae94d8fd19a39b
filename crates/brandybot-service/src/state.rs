//! Application state.

use std::sync::Arc;
use std::time::Duration;

use brandybot_store::Store;

use crate::ai::AiClient;
use crate::auth::{FirebaseVerifier, IdentityProvider};
use crate::config::ServiceConfig;
use crate::imgbb::ImgbbClient;
use crate::llm::LlmClient;
use crate::rate_limit::RateLimits;
use crate::removebg::RemoveBgClient;

/// Error building the application state.
#[derive(Debug, thiserror::Error)]
#[error("failed to build {component} client: {reason}")]
pub struct StateError {
    component: &'static str,
    reason: String,
}

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// The storage backend.
    pub store: Arc<dyn Store>,

    /// Service configuration.
    pub config: ServiceConfig,

    /// Identity provider.
    pub identity: Arc<dyn IdentityProvider>,

    /// AI image service client.
    pub ai: Arc<AiClient>,

    /// LLM provider chain (optional).
    pub llm: Option<Arc<LlmClient>>,

    /// `ImgBB` client (optional).
    pub imgbb: Option<Arc<ImgbbClient>>,

    /// remove.bg client (optional).
    pub remove_bg: Option<Arc<RemoveBgClient>>,

    /// Rate limiter buckets.
    pub limits: RateLimits,
}

impl AppState {
    /// Create a new application state with the Firebase identity provider.
    ///
    /// # Errors
    ///
    /// Returns an error if an HTTP client cannot be built.
    pub fn new(store: Arc<dyn Store>, config: ServiceConfig) -> Result<Self, StateError> {
        let identity = FirebaseVerifier::new(&config.firebase).map_err(|e| StateError {
            component: "identity provider",
            reason: e.to_string(),
        })?;
        Self::with_identity(store, config, Arc::new(identity))
    }

    /// Create a new application state with an explicit identity provider.
    ///
    /// # Errors
    ///
    /// Returns an error if an HTTP client cannot be built.
    pub fn with_identity(
        store: Arc<dyn Store>,
        config: ServiceConfig,
        identity: Arc<dyn IdentityProvider>,
    ) -> Result<Self, StateError> {
        let ai = AiClient::new(
            &config.ai_service_url,
            Duration::from_secs(config.ai_timeout_seconds),
        )
        .map_err(|e| StateError {
            component: "AI service",
            reason: e.to_string(),
        })?;
        tracing::info!(ai_url = %config.ai_service_url, "AI service client ready");

        let llm = LlmClient::from_config(&config.llm).map_err(|e| StateError {
            component: "LLM",
            reason: e.to_string(),
        })?;
        match &llm {
            Some(llm) => tracing::info!(providers = ?llm.provider_names(), "LLM integration enabled"),
            None => tracing::warn!("No LLM configured - chat falls back to canned replies"),
        }

        let imgbb = config
            .imgbb_api_key
            .as_ref()
            .map(|key| ImgbbClient::new(&config.imgbb_api_url, key))
            .transpose()
            .map_err(|e| StateError {
                component: "ImgBB",
                reason: e.to_string(),
            })?;
        if imgbb.is_none() {
            tracing::warn!("ImgBB not configured - logos are returned as data URLs");
        }

        let remove_bg = config
            .remove_bg_api_key
            .as_ref()
            .map(|key| RemoveBgClient::new(&config.remove_bg_api_url, key))
            .transpose()
            .map_err(|e| StateError {
                component: "remove.bg",
                reason: e.to_string(),
            })?;
        if remove_bg.is_none() {
            tracing::warn!("remove.bg not configured - background removal is unavailable");
        }

        let limits = RateLimits::from_config(&config.rate_limit);

        Ok(Self {
            store,
            config,
            identity,
            ai: Arc::new(ai),
            llm: llm.map(Arc::new),
            imgbb: imgbb.map(Arc::new),
            remove_bg: remove_bg.map(Arc::new),
            limits,
        })
    }

    /// Check if an LLM is configured.
    #[must_use]
    pub fn has_llm(&self) -> bool {
        self.llm.is_some()
    }

    /// Check if image hosting is configured.
    #[must_use]
    pub fn has_imgbb(&self) -> bool {
        self.imgbb.is_some()
    }
}
