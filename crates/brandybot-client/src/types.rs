//! Request and response types for the BrandyBot client.

use brandybot_core::{LogoHistory, MockupKind, User};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Success envelope wrapping every API payload.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    /// Always `true` on success.
    pub success: bool,
    /// Number of items, for list responses.
    #[serde(default)]
    pub count: Option<usize>,
    /// Paging details, for paged responses.
    #[serde(default)]
    pub pagination: Option<Pagination>,
    /// Payload.
    pub data: T,
}

/// Paging details of a list response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Pagination {
    /// 1-based page number.
    pub page: u64,
    /// Page size.
    pub limit: u64,
    /// Total matching records.
    pub total: u64,
    /// Number of pages.
    pub pages: u64,
}

/// One page of a paged list.
#[derive(Debug, Clone)]
pub struct Page<T> {
    /// Items on this page.
    pub items: Vec<T>,
    /// Paging details.
    pub pagination: Pagination,
}

/// API error response.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    /// Always `false`.
    #[serde(default)]
    pub success: bool,
    /// `fail` for client errors, `error` for server errors.
    #[serde(default)]
    pub status: String,
    /// Machine-readable error code.
    #[serde(default)]
    pub code: String,
    /// Human-readable message.
    pub message: String,
}

/// Banner served at `/`.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerInfo {
    /// Product banner.
    pub message: String,
    /// API version.
    pub version: String,
    /// Always `running`.
    pub status: String,
}

/// Liveness probe answer.
#[derive(Debug, Clone, Deserialize)]
pub struct HealthStatus {
    /// Always `healthy`.
    pub status: String,
    /// Server time.
    pub timestamp: DateTime<Utc>,
}

/// Profile fields reported by the identity provider after sign-in.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncRequest {
    /// Display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Avatar URL.
    #[serde(rename = "photoURL", skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct UserPayload {
    pub user: User,
}

/// Plain confirmation message.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageResponse {
    /// Message.
    pub message: String,
}

/// Logo generation request.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateLogoRequest {
    /// Brand name.
    pub brand_name: String,
    /// Free-text description of the logo.
    pub prompt: String,
    /// Style name, e.g. `modern`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    /// Industry.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    /// Preferred colours.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub colors: Vec<String>,
}

/// A finished generation plus the assistant's one-line summary.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratedLogo {
    /// The stored record.
    #[serde(flatten)]
    pub logo: LogoHistory,
    /// Friendly confirmation, present when the prompt was engineered.
    #[serde(default)]
    pub summary: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct RateRequest {
    pub rating: i64,
}

/// Public share details of a brand.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareLink {
    /// Public share token.
    pub share_link: String,
    /// Always `true`.
    pub is_public: bool,
}

/// Brand facts used for stateless guideline generation.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandProfile {
    /// Brand name (required).
    pub brand_name: String,
    /// Industry.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub industry: String,
    /// Target audience.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub target_audience: String,
    /// Personality, e.g. `playful`.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub personality: String,
    /// Preferred colours.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub colors: Vec<String>,
    /// Logo URL.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub logo_url: String,
    /// Prompt the logo was generated from.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub ai_prompt: String,
}

/// Mockup generation request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MockupRequest {
    /// Logo to apply.
    pub logo_url: String,
    /// Template.
    #[serde(rename = "type")]
    pub kind: MockupKind,
    /// Brand to record the mockup on.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand_id: Option<String>,
}

/// Rendered mockup.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MockupResult {
    /// Rendered mockup URL.
    pub mockup_url: String,
    /// Template used.
    #[serde(rename = "type")]
    pub kind: MockupKind,
}

/// A template in the mockup catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MockupTemplate {
    /// Template id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Category.
    pub category: String,
}

/// Speaker of a chat turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// The end user.
    User,
    /// The assistant.
    Assistant,
}

/// One earlier message of a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    /// Speaker.
    pub role: ChatRole,
    /// Text.
    pub content: String,
}

impl ChatTurn {
    /// A user turn.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    /// An assistant turn.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// Chat request.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ChatRequest {
    /// The user's message.
    pub message: String,
    /// Free-text context, e.g. the brand being discussed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    /// Earlier turns, oldest first.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub history: Vec<ChatTurn>,
}

/// Chat answer.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatReply {
    /// Answer text.
    pub message: String,
    /// Always `ai`.
    pub sender: String,
    /// Server time.
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RemoveBgRequest<'a> {
    pub image_url: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RemoveBgResult {
    pub transparent_url: String,
}
