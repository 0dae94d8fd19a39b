//! Logo generation history.
//!
//! Every call to the logo generator produces one [`LogoHistory`] record. The
//! record is written in the `Processing` state before the AI service is
//! called and then moved to `Completed` or `Failed`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{BrandyError, Result};
use crate::validate;
use crate::{LogoId, UserId};

// ============================================================================
// Constants
// ============================================================================

/// Maximum brand name length.
pub const LOGO_BRAND_NAME_MAX: usize = 100;

/// Maximum prompt length.
pub const PROMPT_MAX: usize = 500;

/// URL stored while the AI service is working.
pub const PROCESSING_URL: &str = "processing...";

/// Ratings at or above this mark the logo as selected.
pub const AUTO_SELECT_RATING: u8 = 4;

/// Default rendered logo edge length in pixels.
pub const DEFAULT_LOGO_SIZE: u32 = 1024;

/// One logo generation attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoHistory {
    /// Identifier (time-ordered).
    pub id: LogoId,
    /// Owner.
    pub user_id: UserId,
    /// Brand name the logo was made for.
    pub brand_name: String,
    /// User prompt.
    pub prompt: String,
    /// Industry.
    pub industry: String,
    /// Style.
    pub style: LogoStyle,
    /// Generated image URL.
    pub logo_url: String,
    /// Other candidates.
    pub alternative_logos: Vec<String>,
    /// Palette.
    pub colors: LogoColors,
    /// Fonts.
    pub fonts: LogoFonts,
    /// Image metadata.
    pub metadata: ImageMetadata,
    /// User rating (1..=5).
    pub rating: Option<u8>,
    /// Whether the user picked this logo.
    pub is_selected: bool,
    /// Whether the user downloaded this logo.
    pub is_downloaded: bool,
    /// Generation status.
    pub status: GenerationStatus,
    /// Failure reason.
    pub error_message: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last update time.
    pub updated_at: DateTime<Utc>,
}

/// A validated logo generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogoRequest {
    /// Brand name.
    pub brand_name: String,
    /// User prompt.
    pub prompt: String,
    /// Style.
    pub style: LogoStyle,
    /// Industry.
    pub industry: String,
    /// Requested colours, first one wins as primary.
    pub colors: Vec<String>,
}

impl LogoRequest {
    /// Validate raw request fields.
    ///
    /// # Errors
    ///
    /// Returns a validation error when the brand name or prompt is blank or
    /// over length.
    pub fn new(
        brand_name: &str,
        prompt: &str,
        style: Option<&str>,
        industry: Option<&str>,
        colors: Vec<String>,
    ) -> Result<Self> {
        Ok(Self {
            brand_name: validate::required("Brand name", brand_name, LOGO_BRAND_NAME_MAX)?,
            prompt: validate::required("Prompt", prompt, PROMPT_MAX)?,
            style: style.map_or(LogoStyle::Modern, LogoStyle::parse),
            industry: industry.unwrap_or_default().trim().to_string(),
            colors: colors
                .into_iter()
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty())
                .collect(),
        })
    }

    /// Build the prompt sent to the image model from the user's own prompt.
    #[must_use]
    pub fn image_prompt(&self) -> String {
        self.image_prompt_with(&self.prompt)
    }

    /// Build the image-model prompt around `lead`, which is either the
    /// user's prompt or an LLM-engineered rewrite of it.
    #[must_use]
    pub fn image_prompt_with(&self, lead: &str) -> String {
        let mut parts = vec![lead.trim().to_string()];
        parts.push(format!("brand name \"{}\"", self.brand_name));
        if !self.industry.is_empty() {
            parts.push(format!("{} industry", self.industry));
        }
        parts.push(format!("{} style", self.style.as_str()));
        if !self.colors.is_empty() {
            parts.push(format!("colors: {}", self.colors.join(", ")));
        }
        parts.push("vector logo, white background, professional, clean, no text".to_string());
        parts.join(", ")
    }
}

impl LogoHistory {
    /// Start a record for `request` in the `Processing` state.
    #[must_use]
    pub fn processing(owner: UserId, request: &LogoRequest) -> Self {
        let now = Utc::now();
        Self {
            id: LogoId::generate(),
            user_id: owner,
            brand_name: request.brand_name.clone(),
            prompt: request.prompt.clone(),
            industry: request.industry.clone(),
            style: request.style,
            logo_url: PROCESSING_URL.to_string(),
            alternative_logos: Vec::new(),
            colors: LogoColors::default(),
            fonts: LogoFonts::default(),
            metadata: ImageMetadata::default(),
            rating: None,
            is_selected: false,
            is_downloaded: false,
            status: GenerationStatus::Processing,
            error_message: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Record a successful generation.
    pub fn complete(&mut self, url: String, file_size: u64, requested_colors: &[String]) {
        self.logo_url = url;
        self.colors = LogoColors::default();
        if let Some(primary) = requested_colors.first() {
            self.colors.primary.clone_from(primary);
        }
        self.fonts = LogoFonts::default();
        self.metadata = ImageMetadata {
            file_size,
            ..ImageMetadata::default()
        };
        self.status = GenerationStatus::Completed;
        self.error_message.clear();
        self.updated_at = Utc::now();
    }

    /// Record a failed generation.
    pub fn fail(&mut self, reason: impl Into<String>) {
        self.status = GenerationStatus::Failed;
        self.error_message = reason.into();
        self.updated_at = Utc::now();
    }

    /// Rate the logo; high ratings select it.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRating` outside `1..=5`.
    pub fn rate(&mut self, rating: i64) -> Result<()> {
        let rating = u8::try_from(rating)
            .ok()
            .filter(|r| (1..=5).contains(r))
            .ok_or(BrandyError::InvalidRating)?;
        self.rating = Some(rating);
        if rating >= AUTO_SELECT_RATING {
            self.is_selected = true;
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Mark the logo as downloaded.
    pub fn mark_downloaded(&mut self) {
        self.is_downloaded = true;
        self.updated_at = Utc::now();
    }
}

/// Logo style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogoStyle {
    /// Modern.
    #[default]
    Modern,
    /// Classic.
    Classic,
    /// Minimalist.
    Minimalist,
    /// Playful.
    Playful,
    /// Elegant.
    Elegant,
    /// Bold.
    Bold,
    /// Free-form style the user typed.
    Other,
}

impl LogoStyle {
    /// Parse user input case-insensitively; unknown styles become `Other`,
    /// blank input becomes `Modern`.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "" | "modern" => Self::Modern,
            "classic" => Self::Classic,
            "minimalist" | "minimal" => Self::Minimalist,
            "playful" => Self::Playful,
            "elegant" => Self::Elegant,
            "bold" => Self::Bold,
            _ => Self::Other,
        }
    }

    /// Stable string form.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Modern => "modern",
            Self::Classic => "classic",
            Self::Minimalist => "minimalist",
            Self::Playful => "playful",
            Self::Elegant => "elegant",
            Self::Bold => "bold",
            Self::Other => "other",
        }
    }
}

/// Generation status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationStatus {
    /// Queued.
    Pending,
    /// AI service call in flight.
    Processing,
    /// Image stored.
    Completed,
    /// AI service call failed.
    Failed,
}

impl GenerationStatus {
    /// Stable string form used by the relational store.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl std::str::FromStr for GenerationStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "processing" => Ok(Self::Processing),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            other => Err(format!("unknown generation status: {other}")),
        }
    }
}

/// Logo palette.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogoColors {
    /// Primary.
    pub primary: String,
    /// Secondary.
    pub secondary: String,
    /// Accent.
    pub accent: String,
    /// Further colours.
    pub additional: Vec<String>,
}

impl Default for LogoColors {
    fn default() -> Self {
        Self {
            primary: "#000000".into(),
            secondary: "#FFFFFF".into(),
            accent: "#FF0000".into(),
            additional: Vec::new(),
        }
    }
}

/// Logo fonts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogoFonts {
    /// Primary font.
    pub primary: String,
    /// Secondary font.
    pub secondary: String,
}

impl Default for LogoFonts {
    fn default() -> Self {
        Self {
            primary: "Arial".into(),
            secondary: "Helvetica".into(),
        }
    }
}

/// Image format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    /// PNG.
    #[default]
    Png,
    /// JPEG.
    Jpg,
    /// SVG.
    Svg,
    /// `WebP`.
    Webp,
}

/// Generated image metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImageMetadata {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Format.
    pub format: ImageFormat,
    /// Size in bytes.
    pub file_size: u64,
}

impl Default for ImageMetadata {
    fn default() -> Self {
        Self {
            width: DEFAULT_LOGO_SIZE,
            height: DEFAULT_LOGO_SIZE,
            format: ImageFormat::Png,
            file_size: 0,
        }
    }
}

/// Aggregate statistics over a user's logo history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoStats {
    /// Number of records.
    pub total_logos: i64,
    /// Number of selected logos.
    pub selected_logos: i64,
    /// Number of downloaded logos.
    pub downloaded_logos: i64,
    /// Mean rating over rated logos (0 when none).
    pub average_rating: f64,
}

impl LogoStats {
    /// Compute statistics over a set of records.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a LogoHistory>) -> Self {
        let mut stats = Self::default();
        let mut rating_sum = 0_i64;
        let mut rated = 0_i64;
        for record in records {
            stats.total_logos += 1;
            stats.selected_logos += i64::from(record.is_selected);
            stats.downloaded_logos += i64::from(record.is_downloaded);
            if let Some(rating) = record.rating {
                rating_sum += i64::from(rating);
                rated += 1;
            }
        }
        if rated > 0 {
            stats.average_rating = rating_sum as f64 / rated as f64;
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> LogoRequest {
        LogoRequest::new(
            "Acme",
            "A coffee cup",
            Some("Playful"),
            Some("Food"),
            vec!["#123456".into(), " ".into()],
        )
        .unwrap()
    }

    #[test]
    fn request_validation() {
        assert!(LogoRequest::new("", "prompt", None, None, vec![]).is_err());
        assert!(LogoRequest::new("Acme", " ", None, None, vec![]).is_err());
        assert!(LogoRequest::new("Acme", &"p".repeat(PROMPT_MAX + 1), None, None, vec![]).is_err());

        let req = request();
        assert_eq!(req.style, LogoStyle::Playful);
        assert_eq!(req.colors, vec!["#123456".to_string()]);
    }

    #[test]
    fn image_prompt_joins_available_context() {
        assert_eq!(
            request().image_prompt(),
            "A coffee cup, brand name \"Acme\", Food industry, playful style, colors: #123456, \
             vector logo, white background, professional, clean, no text"
        );

        let bare = LogoRequest::new("Acme", "Owl", None, None, vec![]).unwrap();
        assert!(bare
            .image_prompt_with(" flat owl icon ")
            .starts_with("flat owl icon, brand name \"Acme\""));
        assert_eq!(
            bare.image_prompt(),
            "Owl, brand name \"Acme\", modern style, vector logo, white background, professional, clean, no text"
        );
    }

    #[test]
    fn lifecycle_processing_to_completed() {
        let req = request();
        let mut logo = LogoHistory::processing(UserId::generate(), &req);
        assert_eq!(logo.status, GenerationStatus::Processing);
        assert_eq!(logo.logo_url, PROCESSING_URL);

        logo.complete("https://i.ibb.co/x.png".into(), 2048, &req.colors);
        assert_eq!(logo.status, GenerationStatus::Completed);
        assert_eq!(logo.colors.primary, "#123456");
        assert_eq!(logo.colors.secondary, "#FFFFFF");
        assert_eq!(logo.metadata.file_size, 2048);
        assert_eq!(logo.metadata.width, DEFAULT_LOGO_SIZE);
    }

    #[test]
    fn lifecycle_processing_to_failed() {
        let mut logo = LogoHistory::processing(UserId::generate(), &request());
        logo.fail("timeout");
        assert_eq!(logo.status, GenerationStatus::Failed);
        assert_eq!(logo.error_message, "timeout");
    }

    #[test]
    fn rating_bounds_and_auto_select() {
        let mut logo = LogoHistory::processing(UserId::generate(), &request());
        assert_eq!(logo.rate(0), Err(BrandyError::InvalidRating));
        assert_eq!(logo.rate(6), Err(BrandyError::InvalidRating));
        assert_eq!(logo.rate(-1), Err(BrandyError::InvalidRating));

        logo.rate(3).unwrap();
        assert!(!logo.is_selected);
        logo.rate(4).unwrap();
        assert!(logo.is_selected);
        assert_eq!(logo.rating, Some(4));
    }

    #[test]
    fn style_parsing_is_lenient() {
        assert_eq!(LogoStyle::parse("MINIMAL"), LogoStyle::Minimalist);
        assert_eq!(LogoStyle::parse("retro-futurist"), LogoStyle::Other);
        assert_eq!(LogoStyle::parse(""), LogoStyle::Modern);
    }

    #[test]
    fn stats_average_only_rated_logos() {
        let owner = UserId::generate();
        let mut a = LogoHistory::processing(owner, &request());
        let mut b = LogoHistory::processing(owner, &request());
        let c = LogoHistory::processing(owner, &request());
        a.rate(5).unwrap();
        b.rate(2).unwrap();
        b.mark_downloaded();

        let stats = LogoStats::from_records([&a, &b, &c]);
        assert_eq!(stats.total_logos, 3);
        assert_eq!(stats.selected_logos, 1);
        assert_eq!(stats.downloaded_logos, 1);
        assert!((stats.average_rating - 3.5).abs() < f64::EPSILON);

        assert_eq!(LogoStats::from_records([]), LogoStats::default());
    }
}
