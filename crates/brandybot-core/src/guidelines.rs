//! Brand guideline documents.
//!
//! Two shapes live here:
//!
//! - [`Guidelines`], the document stored on a brand (palette with print/screen
//!   conversions, typography, logo usage rules, voice).
//! - [`GeneratedGuidelines`], the JSON document produced by the LLM, which is
//!   returned as-is by the stateless endpoint and folded into [`Guidelines`]
//!   when saved onto a brand.

use serde::{Deserialize, Serialize};

use crate::error::{BrandyError, Result};

/// Guideline document stored on a brand.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Guidelines {
    /// Colour palette.
    pub colors: ColorPalette,
    /// Typography.
    pub typography: Typography,
    /// Logo usage rules.
    pub logo_usage: LogoUsage,
    /// Voice and tone.
    pub voice: BrandVoice,
    /// Imagery rules.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub imagery: Vec<String>,
}

/// Palette of named colours.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ColorPalette {
    /// Primary colour.
    pub primary: Option<ColorSpec>,
    /// Secondary colour.
    pub secondary: Option<ColorSpec>,
    /// Accent colour.
    pub accent: Option<ColorSpec>,
    /// Further colours.
    pub additional: Vec<ColorSpec>,
}

/// One colour in several notations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ColorSpec {
    /// Human name.
    pub name: String,
    /// `#RRGGBB`.
    pub hex: String,
    /// `rgb(r, g, b)`.
    pub rgb: String,
    /// `cmyk(c%, m%, y%, k%)`.
    pub cmyk: String,
    /// Usage note.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<String>,
}

impl ColorSpec {
    /// Build a colour from a hex value, deriving the RGB and CMYK notations.
    ///
    /// # Errors
    ///
    /// Returns `InvalidColor` if `hex` is not `#RGB` or `#RRGGBB`.
    pub fn from_hex(name: impl Into<String>, hex: &str) -> Result<Self> {
        let (r, g, b) = parse_hex(hex)?;
        Ok(Self {
            name: name.into(),
            hex: format!("#{r:02X}{g:02X}{b:02X}"),
            rgb: format!("rgb({r}, {g}, {b})"),
            cmyk: cmyk_notation(r, g, b),
            usage: None,
        })
    }
}

/// Parse `#RGB` / `#RRGGBB` (the `#` is optional).
///
/// # Errors
///
/// Returns `InvalidColor` for anything else.
pub fn parse_hex(hex: &str) -> Result<(u8, u8, u8)> {
    let digits = hex.trim().trim_start_matches('#');
    let invalid = || BrandyError::InvalidColor(hex.to_string());
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }
    let expanded: String = match digits.len() {
        3 => digits.chars().flat_map(|c| [c, c]).collect(),
        6 => digits.to_string(),
        _ => return Err(invalid()),
    };
    let channel = |i: usize| u8::from_str_radix(&expanded[i..i + 2], 16).map_err(|_| invalid());
    Ok((channel(0)?, channel(2)?, channel(4)?))
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn cmyk_notation(r: u8, g: u8, b: u8) -> String {
    let (r, g, b) = (
        f64::from(r) / 255.0,
        f64::from(g) / 255.0,
        f64::from(b) / 255.0,
    );
    let k = 1.0 - r.max(g).max(b);
    if (1.0 - k).abs() < f64::EPSILON {
        return "cmyk(0%, 0%, 0%, 100%)".to_string();
    }
    let pct = |v: f64| (v * 100.0).round() as u32;
    let c = (1.0 - r - k) / (1.0 - k);
    let m = (1.0 - g - k) / (1.0 - k);
    let y = (1.0 - b - k) / (1.0 - k);
    format!("cmyk({}%, {}%, {}%, {}%)", pct(c), pct(m), pct(y), pct(k))
}

/// Typography choices.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Typography {
    /// Heading font.
    pub primary_font: Option<FontSpec>,
    /// Body font.
    pub secondary_font: Option<FontSpec>,
    /// Why these fonts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rationale: Option<String>,
}

/// A font and how to use it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FontSpec {
    /// Display name.
    pub name: String,
    /// CSS family.
    pub family: String,
    /// Weights in use.
    pub weights: Vec<String>,
    /// Usage note.
    pub usage: String,
}

/// Logo usage rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LogoUsage {
    /// Minimum rendered size.
    pub minimum_size: Option<String>,
    /// Required clear space.
    pub clear_space: Option<String>,
    /// Forbidden uses.
    pub do_nots: Vec<String>,
    /// Recommended uses.
    pub dos: Vec<String>,
}

/// Voice and tone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BrandVoice {
    /// Personality adjectives.
    pub personality: Vec<String>,
    /// Tone summary.
    pub tone: Option<String>,
    /// Keywords and voice rules.
    pub keywords: Vec<String>,
}

// ============================================================================
// LLM output
// ============================================================================

/// Guideline document as generated by the LLM.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneratedGuidelines {
    /// Logo usage rules.
    pub logo_usage: Vec<String>,
    /// Palette.
    pub color_palette: GeneratedPalette,
    /// Typography.
    pub typography: GeneratedTypography,
    /// Voice.
    pub brand_voice: GeneratedVoice,
    /// Dos and don'ts.
    pub dos_and_donts: DosAndDonts,
    /// Imagery rules.
    pub imagery: Vec<String>,
}

/// Generated palette.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratedPalette {
    /// Primary colour.
    pub primary: Option<GeneratedColor>,
    /// Secondary colour.
    pub secondary: Option<GeneratedColor>,
    /// Accent colour.
    pub accent: Option<GeneratedColor>,
}

/// Generated colour.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratedColor {
    /// `#RRGGBB`.
    pub hex: String,
    /// Colour name.
    pub name: String,
    /// Usage note.
    pub usage: String,
}

/// Generated typography.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneratedTypography {
    /// Heading font.
    pub primary_font: String,
    /// Body font.
    pub secondary_font: String,
    /// Heading weight.
    pub heading_weight: String,
    /// Body weight.
    pub body_weight: String,
    /// Rationale.
    pub rationale: String,
}

/// Generated voice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneratedVoice {
    /// Tone adjectives.
    pub tone: Vec<String>,
    /// Voice rules.
    pub guidelines: Vec<String>,
    /// Example phrase.
    pub example_phrase: String,
}

/// Generated dos and don'ts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DosAndDonts {
    /// Dos.
    pub dos: Vec<String>,
    /// Don'ts.
    pub donts: Vec<String>,
}

impl GeneratedGuidelines {
    /// Fold the generated document into the stored shape.
    ///
    /// Colours with an unparseable hex are kept by name with empty notations.
    #[must_use]
    pub fn into_guidelines(self) -> Guidelines {
        let color = |c: Option<GeneratedColor>| {
            c.map(|c| {
                let mut spec = ColorSpec::from_hex(c.name.clone(), &c.hex).unwrap_or(ColorSpec {
                    name: c.name,
                    hex: c.hex,
                    ..ColorSpec::default()
                });
                if !c.usage.is_empty() {
                    spec.usage = Some(c.usage);
                }
                spec
            })
        };
        let font = |name: String, weight: String, usage: &str| {
            (!name.is_empty()).then(|| FontSpec {
                family: name.clone(),
                name,
                weights: if weight.is_empty() { Vec::new() } else { vec![weight] },
                usage: usage.to_string(),
            })
        };
        let typography = self.typography;
        let mut dos = self.logo_usage;
        dos.extend(self.dos_and_donts.dos);

        Guidelines {
            colors: ColorPalette {
                primary: color(self.color_palette.primary),
                secondary: color(self.color_palette.secondary),
                accent: color(self.color_palette.accent),
                additional: Vec::new(),
            },
            typography: Typography {
                primary_font: font(typography.primary_font, typography.heading_weight, "headings"),
                secondary_font: font(typography.secondary_font, typography.body_weight, "body"),
                rationale: (!typography.rationale.is_empty()).then_some(typography.rationale),
            },
            logo_usage: LogoUsage {
                minimum_size: None,
                clear_space: None,
                do_nots: self.dos_and_donts.donts,
                dos,
            },
            voice: BrandVoice {
                personality: self.brand_voice.tone,
                tone: (!self.brand_voice.example_phrase.is_empty())
                    .then_some(self.brand_voice.example_phrase),
                keywords: self.brand_voice.guidelines,
            },
            imagery: self.imagery,
        }
    }
}
