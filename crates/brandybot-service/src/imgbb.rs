//! `ImgBB` image hosting client.

use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::Client;
use serde::Deserialize;

/// Timeout for one upload.
pub const UPLOAD_TIMEOUT: Duration = Duration::from_secs(60);

/// Error type for `ImgBB` operations.
#[derive(Debug, thiserror::Error)]
pub enum ImgbbError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// `ImgBB` returned an error.
    #[error("ImgBB API error: {status} - {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message.
        message: String,
    },
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    data: UploadedImage,
}

#[derive(Debug, Deserialize)]
struct UploadedImage {
    url: String,
}

/// `ImgBB` upload client.
#[derive(Debug, Clone)]
pub struct ImgbbClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl ImgbbClient {
    /// Create a new client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self, ImgbbError> {
        let client = Client::builder().timeout(UPLOAD_TIMEOUT).build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    /// Upload raw image bytes, returning the hosted URL.
    pub async fn upload_bytes(&self, bytes: &[u8]) -> Result<String, ImgbbError> {
        self.upload_base64(&STANDARD.encode(bytes)).await
    }

    /// Upload a base64-encoded image, returning the hosted URL.
    pub async fn upload_base64(&self, image: &str) -> Result<String, ImgbbError> {
        let url = format!("{}/1/upload", self.base_url);

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .form(&[("image", image)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<serde_json::Value>()
                .await
                .ok()
                .and_then(|body| body["error"]["message"].as_str().map(ToString::to_string))
                .unwrap_or_else(|| format!("HTTP {status}"));
            return Err(ImgbbError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let uploaded: UploadResponse = response.json().await?;
        tracing::info!(url = %uploaded.data.url, "Image uploaded to ImgBB");
        Ok(uploaded.data.url)
    }
}
