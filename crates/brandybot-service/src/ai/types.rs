//! AI service API types.

use serde::{Deserialize, Serialize};

/// Response of `POST /generate`.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateResponse {
    /// Base64-encoded PNG.
    #[serde(default)]
    pub image_base64: Option<String>,
}

/// A generated logo image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    /// Base64-encoded PNG as returned by the service.
    pub base64: String,
    /// Size of the decoded image in bytes.
    pub byte_len: u64,
    /// The prompt the service received.
    pub prompt: String,
}

impl GeneratedImage {
    /// Inline `data:` URL for the image.
    #[must_use]
    pub fn data_url(&self) -> String {
        format!("data:image/png;base64,{}", self.base64)
    }
}

/// Request body of `POST /generate/mockup`.
#[derive(Debug, Clone, Serialize)]
pub struct MockupRequest {
    /// Logo to apply.
    pub logo_url: String,
    /// Template id, e.g. `businessCard`.
    pub template_type: String,
}

/// Response of `POST /generate/mockup`.
#[derive(Debug, Clone, Deserialize)]
pub struct MockupResponse {
    /// Rendered mockup URL.
    pub url: String,
}
