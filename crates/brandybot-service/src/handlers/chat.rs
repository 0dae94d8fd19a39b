//! Chat handler.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::handlers::{ApiJson, Envelope};
use crate::llm::{prompts, ChatTurn};
use crate::state::AppState;

/// Chat request.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ChatRequest {
    /// The user's message.
    pub message: Option<String>,
    /// Free-text context, e.g. the brand being discussed.
    pub context: Option<String>,
    /// Earlier turns, oldest first.
    pub history: Vec<ChatTurn>,
}

/// Chat answer.
#[derive(Debug, Serialize)]
pub struct ChatReply {
    /// Answer text.
    pub message: String,
    /// Always `ai`.
    pub sender: &'static str,
    /// Server time.
    pub timestamp: DateTime<Utc>,
}

/// Answer a chat message as the branding consultant.
pub async fn message(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    ApiJson(body): ApiJson<ChatRequest>,
) -> Result<Json<Envelope<ChatReply>>, ApiError> {
    let message = body
        .message
        .filter(|m| !m.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("Message is required".into()))?;

    tracing::debug!(user_id = %auth.user.id, turns = body.history.len(), "Chat message");

    let answer = match &state.llm {
        Some(llm) => {
            llm.chat(message.trim(), body.context.as_deref(), &body.history)
                .await
        }
        None => prompts::CHAT_FALLBACK.to_string(),
    };

    Ok(Json(Envelope::new(ChatReply {
        message: answer,
        sender: "ai",
        timestamp: Utc::now(),
    })))
}
