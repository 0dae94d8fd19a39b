//! LLM request and response types.

use serde::{Deserialize, Deserializer, Serialize};

/// Speaker of a chat turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// The end user.
    User,
    /// The assistant.
    #[serde(alias = "model", alias = "ai")]
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

/// A single completion request handed to a provider.
#[derive(Debug, Clone)]
pub struct Completion<'a> {
    /// System instruction.
    pub system: &'a str,
    /// Earlier turns, oldest first.
    pub history: &'a [ChatTurn],
    /// The new user message.
    pub prompt: String,
    /// Ask the provider for a JSON object.
    pub json: bool,
}

/// Brand facts used to ground prompt engineering and guideline generation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BrandProfile {
    /// Brand name.
    pub brand_name: String,
    /// Tagline.
    pub tagline: String,
    /// What the user asked for.
    pub description: String,
    /// Industry.
    pub industry: String,
    /// Target audience.
    pub target_audience: String,
    /// Personality.
    pub personality: String,
    /// Preferred colours (a string or a list).
    #[serde(deserialize_with = "one_or_many")]
    pub colors: Vec<String>,
    /// Logo style.
    pub style: String,
    /// Generated logo URL.
    pub logo_url: String,
    /// Prompt the logo was generated from.
    pub ai_prompt: String,
}

/// Image prompt produced by the LLM.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineeredPrompt {
    /// Positive prompt for the image model.
    pub sd_prompt: String,
    /// Things the image model should avoid.
    #[serde(default)]
    pub negative_prompt: String,
    /// One friendly sentence for the user.
    #[serde(default)]
    pub summary: String,
}

fn one_or_many<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
        Nothing(()),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(s) => s
            .split(',')
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .collect(),
        OneOrMany::Many(v) => v,
        OneOrMany::Nothing(()) => Vec::new(),
    })
}
