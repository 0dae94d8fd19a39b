//! Instructions, context formatting and fallbacks for the LLM calls.

use super::types::{BrandProfile, EngineeredPrompt};

/// Persona used for chat.
pub const CREATIVE_DIRECTOR: &str = "\
You are **BrandyBot's Creative Director**, an expert AI branding consultant.
Your goal is to help the user define their brand identity through a friendly, professional interview.

**Your Capabilities:**
1.  **Analyze:** Ask clarifying questions about their industry, target audience, and desired \"vibe\" (e.g., minimalist, playful, luxury).
2.  **Advise:** Suggest color palettes, typography styles, and logo concepts based on their answers.
3.  **Output:** When you have enough information, summarize their brand strategy clearly.

**Rules:**
- Keep responses concise (under 3 sentences unless detailing a strategy).
- Be encouraging and creative.
- Do NOT generate images yourself; focus on the *concept* and *text description*.
- If the user asks for a logo, describe what it *should* look like in detail.";

/// Instruction for turning a brand profile into an image prompt.
pub const PROMPT_ENGINEER: &str = "\
You are an expert Prompt Engineer for Stable Diffusion image generation, specializing in professional logo design.
Your task is to convert a brand profile into a highly detailed, optimized image generation prompt that produces a PROFESSIONAL, CLEAN logo.

**Critical Rules for Logo Generation:**
- Always include: \"vector logo\", \"white background\", \"no text\", \"clean\", \"professional\"
- Style keywords based on personality: minimalist=flat design, luxury=gold/silver metallic, playful=cartoon rounded
- The logo must be suitable for business use, with no watermarks and no photorealistic elements
- Include specific color hex values when colors are mentioned

**Input:** A brand profile with name, industry, audience, personality, colors, and style.

**Output:** A STRICT JSON object with ONLY these fields:
- \"sd_prompt\": Highly detailed positive prompt (50-80 words) covering brand type, visual elements, style, colors, mood
- \"negative_prompt\": Elements to avoid; always include \"text, letters, words, watermark, signature, blurry, low quality, realistic photo, human, people, busy background, gradient background\"
- \"summary\": 1-sentence friendly confirmation to user

**Example output for a coffee brand:**
{
  \"sd_prompt\": \"minimalist coffee cup logo icon, steam rising, warm amber and cream color palette, flat vector design, rounded modern shapes, white background, clean professional branding, simple geometric style, cafe business logo, bold silhouette\",
  \"negative_prompt\": \"text, letters, words, watermark, signature, blurry, low quality, realistic photo, human, people, busy background, gradient background, 3d render, complex details\",
  \"summary\": \"I'm generating a minimalist coffee logo with warm amber tones for you!\"
}

RETURN ONLY THE JSON. NO MARKDOWN. NO EXTRA TEXT.";

/// Instruction for generating a guideline document.
pub const BRAND_STRATEGIST: &str = "\
You are an expert Brand Strategist and Creative Director.
Generate comprehensive brand guidelines for the provided brand profile.
IMPORTANT: A logo was already generated for this brand using a specific visual prompt. You MUST ensure your generated color palette, typography choices, and overall vibe exactly match the style described in the AI Logo Prompt provided in the profile.

Return a STRICT JSON object with these sections:
{
  \"logoUsage\": [\"rule 1\", \"rule 2\", \"rule 3\", \"rule 4\"],
  \"colorPalette\": {
    \"primary\": { \"hex\": \"#XXXXXX\", \"name\": \"color name\", \"usage\": \"usage description\" },
    \"secondary\": { \"hex\": \"#XXXXXX\", \"name\": \"color name\", \"usage\": \"usage description\" },
    \"accent\": { \"hex\": \"#XXXXXX\", \"name\": \"color name\", \"usage\": \"usage description\" }
  },
  \"typography\": {
    \"primaryFont\": \"font name\",
    \"secondaryFont\": \"font name\",
    \"headingWeight\": \"700\",
    \"bodyWeight\": \"400\",
    \"rationale\": \"Why these fonts suit the brand\"
  },
  \"brandVoice\": {
    \"tone\": [\"adjective 1\", \"adjective 2\", \"adjective 3\"],
    \"guidelines\": [\"voice rule 1\", \"voice rule 2\", \"voice rule 3\"],
    \"examplePhrase\": \"An example tagline or message in brand voice\"
  },
  \"dosAndDonts\": {
    \"dos\": [\"do 1\", \"do 2\", \"do 3\"],
    \"donts\": [\"dont 1\", \"dont 2\", \"dont 3\"]
  },
  \"imagery\": [\"imagery style rule 1\", \"imagery style rule 2\", \"imagery style rule 3\"]
}

Base everything on the brand profile. Make it specific and actionable, not generic.
RETURN ONLY THE JSON. NO MARKDOWN.";

/// Reply used when no provider answers a chat message.
pub const CHAT_FALLBACK: &str = "I'm having a little trouble thinking right now 🤔 — but I'm here to help! Try asking me about logo generation, brand guidelines, or mockups.";

/// Image prompt used when prompt engineering fails.
#[must_use]
pub fn fallback_prompt() -> EngineeredPrompt {
    EngineeredPrompt {
        sd_prompt: "minimalist professional vector logo, clean design, white background, simple geometric shapes, business branding".into(),
        negative_prompt: "text, letters, words, watermark, signature, blurry, low quality, realistic photo, human, people, busy background".into(),
        summary: "I'm having trouble connecting to my creative brain — but I'll generate a clean professional logo for you!".into(),
    }
}

fn or<'a>(value: &'a str, default: &'a str) -> &'a str {
    if value.trim().is_empty() {
        default
    } else {
        value.trim()
    }
}

/// Profile block for prompt engineering.
#[must_use]
pub fn image_context(profile: &BrandProfile) -> String {
    let colors = profile.colors.join(", ");
    let mut lines = vec![
        format!("Brand Name: {}", or(&profile.brand_name, "Unknown")),
        format!("Tagline: {}", or(&profile.tagline, "None")),
        format!("Industry: {}", or(&profile.industry, "General")),
        format!("Target Audience: {}", or(&profile.target_audience, "General public")),
        format!("Brand Personality: {}", or(&profile.personality, "Professional")),
        format!("Preferred Colors: {}", or(&colors, "Open to suggestions")),
        format!("Logo Style: {}", or(&profile.style, "Modern flat vector")),
    ];
    if !profile.description.trim().is_empty() {
        lines.push(format!("Description: {}", profile.description.trim()));
    }
    lines.join("\n")
}

/// Profile block for guideline generation.
#[must_use]
pub fn guidelines_context(profile: &BrandProfile) -> String {
    let colors = profile.colors.join(", ");
    [
        format!("Brand Name: {}", profile.brand_name.trim()),
        format!("Industry: {}", or(&profile.industry, "General")),
        format!("Target Audience: {}", or(&profile.target_audience, "General public")),
        format!("Brand Personality: {}", or(&profile.personality, "Professional")),
        format!("Preferred Colors: {}", or(&colors, "Not specified")),
        format!("AI Logo Prompt Used: {}", or(&profile.ai_prompt, "None provided")),
    ]
    .join("\n")
}

/// Remove Markdown code fences around a JSON answer.
#[must_use]
pub fn strip_fences(text: &str) -> String {
    text.replace("```json", "").replace("```", "").trim().to_string()
}

/// Prefix a chat message with caller-supplied context.
#[must_use]
pub fn chat_prompt(message: &str, context: Option<&str>) -> String {
    match context.map(str::trim).filter(|c| !c.is_empty()) {
        Some(context) => format!("Context: {context}\n\nUser: {message}"),
        None => message.to_string(),
    }
}
