//! Brand records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::guidelines::Guidelines;
use crate::mockup::MockupKind;
use crate::validate;
use crate::{BrandId, UserId};

/// Maximum brand name length.
pub const BRAND_NAME_MAX: usize = 100;

/// Maximum tagline length.
pub const TAGLINE_MAX: usize = 200;

/// Maximum description length.
pub const DESCRIPTION_MAX: usize = 1000;

/// Primary logo URL used for drafts created without a logo.
pub const PLACEHOLDER_LOGO_URL: &str = "placeholder";

/// A user-owned brand identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Brand {
    /// Identifier.
    pub id: BrandId,
    /// Owner.
    pub user_id: UserId,
    /// Brand name.
    pub brand_name: String,
    /// Tagline.
    pub tagline: String,
    /// Description.
    pub description: String,
    /// Industry.
    pub industry: String,
    /// Target audience.
    pub target_audience: String,
    /// Logo assets.
    pub logo: LogoAssets,
    /// Guideline document.
    pub guidelines: Guidelines,
    /// Generated mockup URLs.
    pub mockups: MockupSet,
    /// Packaged assets.
    pub assets: BrandAssets,
    /// Lifecycle status.
    pub status: BrandStatus,
    /// Whether the brand can be read through its share link.
    pub is_public: bool,
    /// Share token (unique when set).
    pub share_link: Option<String>,
    /// Incremented on every update.
    pub version: i32,
    /// Last editor.
    pub last_updated_by: Option<UserId>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last update time.
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a brand.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewBrand {
    /// Brand name (required).
    pub brand_name: String,
    /// Tagline.
    pub tagline: String,
    /// Description.
    pub description: String,
    /// Industry.
    pub industry: String,
    /// Target audience.
    pub target_audience: String,
    /// Logo assets; a placeholder is used when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<LogoAssets>,
    /// Initial guidelines.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guidelines: Option<Guidelines>,
}

impl Brand {
    /// Validate `input` and build a new active brand owned by `owner`.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a blank name or over-long text fields.
    pub fn new(owner: UserId, input: NewBrand) -> Result<Self> {
        let now = Utc::now();
        Ok(Self {
            id: BrandId::generate(),
            user_id: owner,
            brand_name: validate::required("Brand name", &input.brand_name, BRAND_NAME_MAX)?,
            tagline: validate::bounded("Tagline", &input.tagline, TAGLINE_MAX)?,
            description: validate::bounded("Description", &input.description, DESCRIPTION_MAX)?,
            industry: input.industry.trim().to_string(),
            target_audience: input.target_audience.trim().to_string(),
            logo: input.logo.unwrap_or_else(|| LogoAssets {
                primary_logo_url: PLACEHOLDER_LOGO_URL.to_string(),
                ..LogoAssets::default()
            }),
            guidelines: input.guidelines.unwrap_or_default(),
            mockups: MockupSet::default(),
            assets: BrandAssets::default(),
            status: BrandStatus::Active,
            is_public: false,
            share_link: None,
            version: 1,
            last_updated_by: Some(owner),
            created_at: now,
            updated_at: now,
        })
    }

    /// Apply an update. Only the fields carried by [`BrandUpdate`] can change.
    ///
    /// Bumps `version` and records `editor`.
    ///
    /// # Errors
    ///
    /// Returns a validation error without modifying the brand.
    pub fn apply(&mut self, update: BrandUpdate, editor: UserId) -> Result<()> {
        let brand_name = update
            .brand_name
            .filter(|n| !n.trim().is_empty())
            .map(|n| validate::required("Brand name", &n, BRAND_NAME_MAX))
            .transpose()?;
        let tagline = update
            .tagline
            .map(|t| validate::bounded("Tagline", &t, TAGLINE_MAX))
            .transpose()?;
        let description = update
            .description
            .map(|d| validate::bounded("Description", &d, DESCRIPTION_MAX))
            .transpose()?;

        if let Some(name) = brand_name {
            self.brand_name = name;
        }
        if let Some(tagline) = tagline {
            self.tagline = tagline;
        }
        if let Some(description) = description {
            self.description = description;
        }
        if let Some(industry) = update.industry.filter(|s| !s.trim().is_empty()) {
            self.industry = industry.trim().to_string();
        }
        if let Some(audience) = update.target_audience.filter(|s| !s.trim().is_empty()) {
            self.target_audience = audience.trim().to_string();
        }
        if let Some(logo) = update.logo {
            self.logo.merge(logo);
        }
        if let Some(guidelines) = update.guidelines {
            self.guidelines = guidelines;
        }
        if let Some(mockups) = update.mockups {
            self.mockups = mockups;
        }
        if let Some(assets) = update.assets {
            self.assets = assets;
        }

        self.bump(editor);
        Ok(())
    }

    /// Replace the guideline document.
    pub fn set_guidelines(&mut self, guidelines: Guidelines, editor: UserId) {
        self.guidelines = guidelines;
        self.bump(editor);
    }

    /// Record a generated mockup URL.
    pub fn record_mockup(&mut self, kind: MockupKind, url: String, editor: UserId) {
        self.mockups.record(kind, url);
        self.bump(editor);
    }

    /// Make the brand public under a fresh share token `<id>-<random>`.
    pub fn publish(&mut self) -> &str {
        let nonce = uuid::Uuid::new_v4().simple().to_string();
        self.share_link = Some(format!("{}-{}", self.id, &nonce[..13]));
        self.is_public = true;
        self.updated_at = Utc::now();
        self.share_link.as_deref().unwrap_or_default()
    }

    /// Set the lifecycle status.
    pub fn set_status(&mut self, status: BrandStatus, editor: UserId) {
        self.status = status;
        self.last_updated_by = Some(editor);
        self.updated_at = Utc::now();
    }

    fn bump(&mut self, editor: UserId) {
        self.version += 1;
        self.last_updated_by = Some(editor);
        self.updated_at = Utc::now();
    }
}

/// Fields a brand owner may update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandUpdate {
    /// Brand name; blank is ignored.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand_name: Option<String>,
    /// Tagline; may be cleared with an empty string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tagline: Option<String>,
    /// Description; may be cleared with an empty string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Industry; blank is ignored.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    /// Target audience; blank is ignored.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_audience: Option<String>,
    /// Logo fields to merge.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<LogoAssetsUpdate>,
    /// Replacement guideline document.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guidelines: Option<Guidelines>,
    /// Replacement mockup set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mockups: Option<MockupSet>,
    /// Replacement asset links.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assets: Option<BrandAssets>,
}

/// Brand lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BrandStatus {
    /// Work in progress.
    Draft,
    /// Active brand.
    #[default]
    Active,
    /// Archived brand.
    Archived,
}

impl BrandStatus {
    /// Stable string form used by the relational store.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Active => "active",
            Self::Archived => "archived",
        }
    }
}

impl std::str::FromStr for BrandStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Self::Draft),
            "active" => Ok(Self::Active),
            "archived" => Ok(Self::Archived),
            other => Err(format!("unknown brand status: {other}")),
        }
    }
}

/// Logo assets attached to a brand.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LogoAssets {
    /// Main logo.
    pub primary_logo_url: String,
    /// Other candidates.
    pub alternative_logos: Vec<String>,
    /// Layout and background variants.
    pub logo_variants: LogoVariants,
}

/// Logo variants.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogoVariants {
    /// For light backgrounds.
    pub light: Option<String>,
    /// For dark backgrounds.
    pub dark: Option<String>,
    /// Icon / favicon.
    pub icon: Option<String>,
    /// Horizontal layout.
    pub horizontal: Option<String>,
    /// Vertical layout.
    pub vertical: Option<String>,
}

/// Partial logo assets; present fields overwrite.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoAssetsUpdate {
    /// Main logo.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_logo_url: Option<String>,
    /// Other candidates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alternative_logos: Option<Vec<String>>,
    /// Variants.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_variants: Option<LogoVariants>,
}

impl LogoAssets {
    /// Shallow merge of `update` into `self`.
    pub fn merge(&mut self, update: LogoAssetsUpdate) {
        if let Some(url) = update.primary_logo_url {
            self.primary_logo_url = url;
        }
        if let Some(alternatives) = update.alternative_logos {
            self.alternative_logos = alternatives;
        }
        if let Some(variants) = update.logo_variants {
            self.logo_variants = variants;
        }
    }
}

/// Mockup URLs grouped by medium.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MockupSet {
    /// Business card faces.
    pub business_card: BusinessCardMockup,
    /// Letterhead.
    pub letterhead: Option<String>,
    /// Social media kit.
    pub social_media: SocialMediaMockups,
    /// Merchandise.
    pub merchandise: MerchandiseMockups,
    /// Digital surfaces.
    pub digital: DigitalMockups,
}

/// Business card mockups.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BusinessCardMockup {
    /// Front face.
    pub front_url: Option<String>,
    /// Back face.
    pub back_url: Option<String>,
}

/// Social media mockups.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialMediaMockups {
    /// Facebook.
    pub facebook: Option<String>,
    /// Instagram.
    pub instagram: Option<String>,
    /// Twitter.
    pub twitter: Option<String>,
    /// `LinkedIn`.
    pub linkedin: Option<String>,
}

/// Merchandise mockups.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MerchandiseMockups {
    /// T-shirt.
    pub tshirt: Option<String>,
    /// Mug.
    pub mug: Option<String>,
    /// Bag.
    pub bag: Option<String>,
    /// Anything else (signage and the like).
    pub other: Vec<String>,
}

/// Digital mockups.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DigitalMockups {
    /// Website hero.
    pub website: Option<String>,
    /// Mobile app.
    pub mobile_app: Option<String>,
    /// Email.
    pub email: Option<String>,
}

impl MockupSet {
    /// Store `url` in the slot for `kind`.
    ///
    /// The social media kit is one square render shared by every network.
    pub fn record(&mut self, kind: MockupKind, url: String) {
        match kind {
            MockupKind::BusinessCard => self.business_card.front_url = Some(url),
            MockupKind::Tshirt => self.merchandise.tshirt = Some(url),
            MockupKind::Signage => {
                if !self.merchandise.other.contains(&url) {
                    self.merchandise.other.push(url);
                }
            }
            MockupKind::Website => self.digital.website = Some(url),
            MockupKind::SocialMedia => {
                let social = &mut self.social_media;
                social.facebook = Some(url.clone());
                social.instagram = Some(url.clone());
                social.twitter = Some(url.clone());
                social.linkedin = Some(url);
            }
        }
    }
}

/// Packaged asset links.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BrandAssets {
    /// Guideline PDF.
    pub guideline_pdf_url: Option<String>,
    /// Logo package ZIP.
    pub logo_package_url: Option<String>,
    /// Mockup package ZIP.
    pub mockup_package_url: Option<String>,
    /// Complete brand kit.
    pub brand_kit_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BrandyError;

    fn new_brand(owner: UserId) -> Brand {
        Brand::new(
            owner,
            NewBrand {
                brand_name: "  Acme Coffee ".into(),
                tagline: "Wake up".into(),
                industry: "Food".into(),
                ..NewBrand::default()
            },
        )
        .unwrap()
    }

    #[test]
    fn new_brand_defaults() {
        let owner = UserId::generate();
        let brand = new_brand(owner);
        assert_eq!(brand.brand_name, "Acme Coffee");
        assert_eq!(brand.logo.primary_logo_url, PLACEHOLDER_LOGO_URL);
        assert_eq!(brand.status, BrandStatus::Active);
        assert_eq!(brand.version, 1);
        assert!(!brand.is_public);
        assert!(brand.share_link.is_none());
    }

    #[test]
    fn new_brand_validates_fields() {
        let owner = UserId::generate();
        let missing = Brand::new(owner, NewBrand::default());
        assert_eq!(
            missing.unwrap_err(),
            BrandyError::MissingField {
                field: "Brand name"
            }
        );

        let long_tagline = Brand::new(
            owner,
            NewBrand {
                brand_name: "Acme".into(),
                tagline: "x".repeat(TAGLINE_MAX + 1),
                ..NewBrand::default()
            },
        );
        assert_eq!(
            long_tagline.unwrap_err(),
            BrandyError::TooLong {
                field: "Tagline",
                max: TAGLINE_MAX
            }
        );
    }

    #[test]
    fn update_changes_only_supplied_fields_and_bumps_version() {
        let owner = UserId::generate();
        let mut brand = new_brand(owner);
        let editor = UserId::generate();

        brand
            .apply(
                BrandUpdate {
                    tagline: Some(String::new()),
                    industry: Some("  ".into()),
                    logo: Some(LogoAssetsUpdate {
                        primary_logo_url: Some("https://img/1.png".into()),
                        ..LogoAssetsUpdate::default()
                    }),
                    ..BrandUpdate::default()
                },
                editor,
            )
            .unwrap();

        assert_eq!(brand.brand_name, "Acme Coffee");
        assert_eq!(brand.tagline, "");
        assert_eq!(brand.industry, "Food");
        assert_eq!(brand.logo.primary_logo_url, "https://img/1.png");
        assert_eq!(brand.version, 2);
        assert_eq!(brand.last_updated_by, Some(editor));
        assert_eq!(brand.user_id, owner);
    }

    #[test]
    fn invalid_update_leaves_brand_untouched() {
        let owner = UserId::generate();
        let mut brand = new_brand(owner);
        let before = brand.clone();

        let result = brand.apply(
            BrandUpdate {
                brand_name: Some("Renamed".into()),
                description: Some("d".repeat(DESCRIPTION_MAX + 1)),
                ..BrandUpdate::default()
            },
            owner,
        );

        assert!(result.is_err());
        assert_eq!(brand, before);
    }

    #[test]
    fn publish_assigns_prefixed_token() {
        let mut brand = new_brand(UserId::generate());
        let token = brand.publish().to_string();
        assert!(token.starts_with(&format!("{}-", brand.id)));
        assert!(brand.is_public);

        let again = brand.publish().to_string();
        assert_ne!(token, again);
    }

    #[test]
    fn mockups_land_in_their_slots() {
        let mut set = MockupSet::default();
        set.record(MockupKind::Tshirt, "t.png".into());
        set.record(MockupKind::Signage, "s.png".into());
        set.record(MockupKind::Signage, "s.png".into());
        set.record(MockupKind::SocialMedia, "kit.png".into());

        assert_eq!(set.merchandise.tshirt.as_deref(), Some("t.png"));
        assert_eq!(set.merchandise.other, vec!["s.png".to_string()]);
        assert_eq!(set.social_media.linkedin.as_deref(), Some("kit.png"));
    }

    #[test]
    fn status_parses() {
        assert_eq!("archived".parse::<BrandStatus>(), Ok(BrandStatus::Archived));
        assert!("deleted".parse::<BrandStatus>().is_err());
    }
}
