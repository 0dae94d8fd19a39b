//! LLM integration for chat, image prompt engineering and brand guidelines.
//!
//! Providers are tried in order (Gemini, then OpenAI). Chat and prompt
//! engineering degrade to fixed fallbacks; guideline generation reports the
//! last provider error.

pub mod gemini;
pub mod openai;
pub mod prompts;
pub mod types;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;

use brandybot_core::GeneratedGuidelines;

use crate::config::LlmConfig;

pub use gemini::GeminiProvider;
pub use openai::OpenAiProvider;
pub use types::*;

/// Timeout for one LLM provider call.
pub const LLM_TIMEOUT: Duration = Duration::from_secs(60);

/// Error type for LLM operations.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider returned an error.
    #[error("{provider} API error: {status} - {message}")]
    Api {
        /// Provider name.
        provider: &'static str,
        /// HTTP status code.
        status: u16,
        /// Error message.
        message: String,
    },

    /// The provider returned no text.
    #[error("{0} returned an empty response")]
    EmptyResponse(&'static str),

    /// The answer was not the requested JSON document.
    #[error("Unparseable JSON from model: {0}")]
    Json(#[from] serde_json::Error),

    /// No provider is configured.
    #[error("No AI provider initialized.")]
    NoProvider,
}

/// A text-completion backend.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Short provider name for logs.
    fn name(&self) -> &'static str;

    /// Complete `request`, returning the raw answer text.
    async fn complete(&self, request: &Completion<'_>) -> Result<String, LlmError>;
}

/// Build an [`LlmError::Api`] from a failed response.
pub(crate) async fn api_error(provider: &'static str, response: reqwest::Response) -> LlmError {
    let status = response.status();
    let message = response
        .json::<serde_json::Value>()
        .await
        .ok()
        .and_then(|body| body["error"]["message"].as_str().map(ToString::to_string))
        .unwrap_or_else(|| format!("HTTP {status}"));
    LlmError::Api {
        provider,
        status: status.as_u16(),
        message,
    }
}

/// Provider chain used by the handlers.
#[derive(Clone)]
pub struct LlmClient {
    providers: Vec<Arc<dyn LlmProvider>>,
}

impl LlmClient {
    /// Build the chain from configured API keys.
    ///
    /// Returns `Ok(None)` when no key is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(config: &LlmConfig) -> Result<Option<Self>, LlmError> {
        let client = Client::builder().timeout(LLM_TIMEOUT).build()?;
        let mut providers: Vec<Arc<dyn LlmProvider>> = Vec::new();

        if let Some(key) = &config.gemini_api_key {
            providers.push(Arc::new(GeminiProvider::new(
                client.clone(),
                &config.gemini_api_url,
                key,
                &config.gemini_model,
            )));
        }
        if let Some(key) = &config.openai_api_key {
            providers.push(Arc::new(OpenAiProvider::new(
                client,
                &config.openai_api_url,
                key,
                &config.openai_model,
            )));
        }

        Ok((!providers.is_empty()).then(|| Self::with_providers(providers)))
    }

    /// Build a chain from explicit providers.
    #[must_use]
    pub fn with_providers(providers: Vec<Arc<dyn LlmProvider>>) -> Self {
        Self { providers }
    }

    /// Names of the providers, in the order they are tried.
    #[must_use]
    pub fn provider_names(&self) -> Vec<&'static str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// Answer a chat message as the creative director, or the fallback text.
    pub async fn chat(&self, message: &str, context: Option<&str>, history: &[ChatTurn]) -> String {
        let request = Completion {
            system: prompts::CREATIVE_DIRECTOR,
            history,
            prompt: prompts::chat_prompt(message, context),
            json: false,
        };

        for provider in &self.providers {
            match provider.complete(&request).await {
                Ok(text) => return text.trim().to_string(),
                Err(e) => {
                    tracing::warn!(provider = provider.name(), error = %e, "Chat completion failed");
                }
            }
        }

        prompts::CHAT_FALLBACK.to_string()
    }

    /// Turn a brand profile into an image prompt, or the fallback prompt.
    pub async fn engineer_prompt(&self, profile: &BrandProfile) -> EngineeredPrompt {
        let prompt = format!("Brand Profile:\n{}", prompts::image_context(profile));
        match self
            .complete_json::<EngineeredPrompt>(prompts::PROMPT_ENGINEER, prompt)
            .await
        {
            Ok(engineered) if !engineered.sd_prompt.trim().is_empty() => engineered,
            Ok(_) => {
                tracing::warn!("Prompt engineering returned an empty prompt, using fallback");
                prompts::fallback_prompt()
            }
            Err(e) => {
                tracing::warn!(error = %e, "Prompt engineering failed, using fallback");
                prompts::fallback_prompt()
            }
        }
    }

    /// Generate a guideline document for `profile`.
    ///
    /// # Errors
    ///
    /// Returns the last provider error when every provider fails.
    pub async fn generate_guidelines(
        &self,
        profile: &BrandProfile,
    ) -> Result<GeneratedGuidelines, LlmError> {
        let prompt = format!("Brand Profile:\n{}", prompts::guidelines_context(profile));
        self.complete_json(prompts::BRAND_STRATEGIST, prompt).await
    }

    async fn complete_json<T: DeserializeOwned>(
        &self,
        system: &str,
        prompt: String,
    ) -> Result<T, LlmError> {
        let request = Completion {
            system,
            history: &[],
            prompt,
            json: true,
        };

        let mut last_error = LlmError::NoProvider;
        for provider in &self.providers {
            let parsed = provider.complete(&request).await.and_then(|text| {
                serde_json::from_str(&prompts::strip_fences(&text)).map_err(LlmError::from)
            });
            match parsed {
                Ok(value) => return Ok(value),
                Err(e) => {
                    tracing::warn!(provider = provider.name(), error = %e, "JSON completion failed");
                    last_error = e;
                }
            }
        }
        Err(last_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Provider returning scripted answers and recording prompts.
    struct Scripted {
        answer: Result<&'static str, ()>,
        prompts: Mutex<Vec<String>>,
    }

    impl Scripted {
        fn new(answer: Result<&'static str, ()>) -> Arc<Self> {
            Arc::new(Self {
                answer,
                prompts: Mutex::new(Vec::new()),
            })
        }
    }

    fn chain(providers: &[&Arc<Scripted>]) -> LlmClient {
        LlmClient::with_providers(
            providers
                .iter()
                .map(|p| Arc::clone(p) as Arc<dyn LlmProvider>)
                .collect(),
        )
    }

    #[async_trait]
    impl LlmProvider for Scripted {
        fn name(&self) -> &'static str {
            "scripted"
        }

        async fn complete(&self, request: &Completion<'_>) -> Result<String, LlmError> {
            self.prompts.lock().unwrap().push(request.prompt.clone());
            self.answer
                .map(ToString::to_string)
                .map_err(|()| LlmError::EmptyResponse("scripted"))
        }
    }

    #[tokio::test]
    async fn chat_falls_through_to_next_provider() {
        let failing = Scripted::new(Err(()));
        let working = Scripted::new(Ok("  Try a bold serif. "));
        let llm = chain(&[&failing, &working]);

        assert_eq!(llm.chat("fonts?", None, &[]).await, "Try a bold serif.");
        assert_eq!(failing.prompts.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn chat_without_working_provider_uses_fallback() {
        let llm = chain(&[&Scripted::new(Err(()))]);
        assert_eq!(llm.chat("hello", None, &[]).await, prompts::CHAT_FALLBACK);
    }

    #[tokio::test]
    async fn engineered_prompt_parses_fenced_json() {
        let llm = chain(&[&Scripted::new(Ok(
            "```json\n{\"sd_prompt\":\"owl icon\",\"negative_prompt\":\"text\",\"summary\":\"Owl!\"}\n```",
        ))]);
        let engineered = llm
            .engineer_prompt(&BrandProfile {
                brand_name: "Hoot".into(),
                ..BrandProfile::default()
            })
            .await;
        assert_eq!(engineered.sd_prompt, "owl icon");
        assert_eq!(engineered.summary, "Owl!");
    }

    #[tokio::test]
    async fn unparseable_prompt_uses_fallback() {
        let llm = chain(&[&Scripted::new(Ok("not json"))]);
        let engineered = llm.engineer_prompt(&BrandProfile::default()).await;
        assert_eq!(engineered, prompts::fallback_prompt());
    }

    #[tokio::test]
    async fn guideline_failure_reports_error() {
        let llm = chain(&[&Scripted::new(Ok("{\"imagery\": 5}"))]);
        let err = llm
            .generate_guidelines(&BrandProfile::default())
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::Json(_)));
    }

    #[test]
    fn no_keys_means_no_client() {
        assert!(LlmClient::from_config(&LlmConfig::default()).unwrap().is_none());

        let config = LlmConfig {
            openai_api_key: Some("sk-test".into()),
            gemini_api_key: Some("g-test".into()),
            ..LlmConfig::default()
        };
        let llm = LlmClient::from_config(&config).unwrap().unwrap();
        assert_eq!(llm.provider_names(), vec!["gemini", "openai"]);
    }
}
