//! AI service client implementation.

use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::Client;

use super::types::{GenerateResponse, GeneratedImage, MockupRequest, MockupResponse};

/// Error type for AI service operations.
#[derive(Debug, thiserror::Error)]
pub enum AiError {
    /// HTTP request failed (including timeouts).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("AI Service returned status {status}: {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body excerpt.
        body: String,
    },

    /// The response did not have the expected shape.
    #[error("Invalid response from AI Service: {0}")]
    InvalidResponse(&'static str),
}

/// Longest response body excerpt kept in errors.
const ERROR_BODY_LIMIT: usize = 300;

/// AI image service client.
#[derive(Debug, Clone)]
pub struct AiClient {
    client: Client,
    base_url: String,
}

impl AiClient {
    /// Create a new AI service client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Service URL (e.g., `"http://localhost:8000"`)
    /// * `timeout` - Per-request timeout; image generation is slow
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, AiError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Render a logo for `prompt`.
    ///
    /// `negative_prompt` is forwarded when the prompt was engineered by the LLM.
    pub async fn generate_logo(
        &self,
        prompt: &str,
        negative_prompt: Option<&str>,
    ) -> Result<GeneratedImage, AiError> {
        let url = format!("{}/generate", self.base_url);

        tracing::info!(url = %url, prompt = %truncate(prompt, 120), "Calling AI service");

        let mut query = vec![("prompt", prompt)];
        if let Some(negative) = negative_prompt.filter(|n| !n.is_empty()) {
            query.push(("negative_prompt", negative));
        }

        let response = self
            .client
            .post(&url)
            .query(&query)
            .header("ngrok-skip-browser-warning", "true")
            .send()
            .await?;

        let body: GenerateResponse = self.handle_response(response).await?;

        let base64 = body
            .image_base64
            .filter(|b| !b.is_empty())
            .ok_or(AiError::InvalidResponse("Missing image_base64 field"))?;
        let bytes = STANDARD
            .decode(base64.as_bytes())
            .map_err(|_| AiError::InvalidResponse("image_base64 is not valid base64"))?;

        tracing::info!(size_kb = bytes.len() / 1024, "Logo generated");

        Ok(GeneratedImage {
            base64,
            byte_len: bytes.len() as u64,
            prompt: prompt.to_string(),
        })
    }

    /// Apply `logo_url` onto the `template_type` product template.
    pub async fn generate_mockup(
        &self,
        logo_url: &str,
        template_type: &str,
    ) -> Result<String, AiError> {
        let url = format!("{}/generate/mockup", self.base_url);
        let request = MockupRequest {
            logo_url: logo_url.to_string(),
            template_type: template_type.to_string(),
        };

        let response = self
            .client
            .post(&url)
            .header("ngrok-skip-browser-warning", "true")
            .json(&request)
            .send()
            .await?;

        let body: MockupResponse = self.handle_response(response).await?;
        if body.url.is_empty() {
            return Err(AiError::InvalidResponse("Missing url field"));
        }
        Ok(body.url)
    }

    /// Handle API response, parsing success or error.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, AiError> {
        let status = response.status();

        if status.is_success() {
            return response
                .json()
                .await
                .map_err(|_| AiError::InvalidResponse("body is not the expected JSON"));
        }

        let body = response.text().await.unwrap_or_default();
        Err(AiError::Api {
            status: status.as_u16(),
            body: truncate(&body, ERROR_BODY_LIMIT).to_string(),
        })
    }
}

/// Cut `s` to at most `max` characters.
pub(crate) fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = AiClient::new("http://localhost:8000/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.base_url, "http://localhost:8000");
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("héllo", 2), "hé");
        assert_eq!(truncate("hi", 10), "hi");
    }

    #[test]
    fn missing_image_error_message() {
        assert_eq!(
            AiError::InvalidResponse("Missing image_base64 field").to_string(),
            "Invalid response from AI Service: Missing image_base64 field"
        );
    }
}
