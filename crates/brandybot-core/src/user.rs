//! User records synced from the identity provider.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::validate;
use crate::UserId;

/// A BrandyBot user.
///
/// Rows are created on first authenticated request and keyed locally by
/// [`UserId`]; `uid` is the identity provider's subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Local identifier.
    pub id: UserId,
    /// Identity-provider UID (unique).
    pub uid: String,
    /// Lowercased email (unique).
    pub email: String,
    /// Display name.
    pub display_name: String,
    /// Avatar URL.
    #[serde(rename = "photoURL")]
    pub photo_url: String,
    /// Sign-in provider.
    pub provider: AuthProvider,
    /// Role.
    pub role: Role,
    /// Whether the account is active.
    pub is_active: bool,
    /// UI preferences.
    pub preferences: Preferences,
    /// Usage counters.
    pub stats: UsageStats,
    /// Last sign-in.
    pub last_login: DateTime<Utc>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last update time.
    pub updated_at: DateTime<Utc>,
}

/// Fields needed to create a user from an identity-provider token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    /// Identity-provider UID.
    pub uid: String,
    /// Email claim.
    pub email: String,
    /// Name claim.
    pub display_name: String,
    /// Picture claim.
    pub photo_url: String,
    /// Sign-in provider claim.
    pub provider: AuthProvider,
}

impl User {
    /// Build a new user from token claims.
    ///
    /// # Errors
    ///
    /// Returns `InvalidEmail` if the email claim is malformed.
    pub fn new(input: NewUser) -> Result<Self> {
        let now = Utc::now();
        Ok(Self {
            id: UserId::generate(),
            uid: input.uid,
            email: validate::email(&input.email)?,
            display_name: input.display_name.trim().to_string(),
            photo_url: input.photo_url,
            provider: input.provider,
            role: Role::User,
            is_active: true,
            preferences: Preferences::default(),
            stats: UsageStats::default(),
            last_login: now,
            created_at: now,
            updated_at: now,
        })
    }

    /// Apply a profile update. Blank names are ignored.
    pub fn apply_profile(&mut self, update: ProfileUpdate) {
        if let Some(name) = update.display_name.filter(|n| !n.trim().is_empty()) {
            self.display_name = name.trim().to_string();
        }
        if let Some(photo) = update.photo_url.filter(|p| !p.trim().is_empty()) {
            self.photo_url = photo;
        }
        if let Some(patch) = update.preferences {
            self.preferences.merge(patch);
        }
        self.updated_at = Utc::now();
    }

    /// Record a sign-in.
    pub fn touch_login(&mut self) {
        let now = Utc::now();
        self.last_login = now;
        self.updated_at = now;
    }

    /// Count one more generated logo.
    pub fn record_logo_generated(&mut self) {
        self.stats.logos_generated += 1;
        self.updated_at = Utc::now();
    }

    /// Count one more created brand.
    pub fn record_brand_created(&mut self) {
        self.stats.brands_created += 1;
        self.updated_at = Utc::now();
    }
}

/// Profile fields a user may change about themselves.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    /// New display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// New avatar URL.
    #[serde(rename = "photoURL", skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    /// Preferences to merge.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferences: Option<PreferencesPatch>,
}

/// Authentication provider used to sign in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthProvider {
    /// Google account.
    Google,
    /// Facebook account.
    Facebook,
    /// Microsoft account.
    Microsoft,
    /// Email and password.
    Password,
    /// Anything else the provider reports.
    Unknown,
}

impl AuthProvider {
    /// Map a Firebase `sign_in_provider` value (`google.com`, `password`, ...).
    #[must_use]
    pub fn from_sign_in_provider(value: &str) -> Self {
        match value.trim_end_matches(".com") {
            "google" => Self::Google,
            "facebook" => Self::Facebook,
            "microsoft" => Self::Microsoft,
            "password" => Self::Password,
            _ => Self::Unknown,
        }
    }

    /// Stable string form used by the relational store.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Google => "google",
            Self::Facebook => "facebook",
            Self::Microsoft => "microsoft",
            Self::Password => "password",
            Self::Unknown => "unknown",
        }
    }
}

impl std::str::FromStr for AuthProvider {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::from_sign_in_provider(s))
    }
}

/// User role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Regular user.
    #[default]
    User,
    /// Administrator.
    Admin,
}

impl Role {
    /// Stable string form used by the relational store.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }

    /// Parse the stored form; unknown values fall back to `User`.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        if value == "admin" {
            Self::Admin
        } else {
            Self::User
        }
    }
}

/// UI theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    /// Light theme.
    Light,
    /// Dark theme.
    Dark,
    /// Follow the system.
    #[default]
    Auto,
}

/// User preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    /// Whether notifications are enabled.
    pub notifications: bool,
    /// UI theme.
    pub theme: Theme,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            notifications: true,
            theme: Theme::Auto,
        }
    }
}

/// Partial preferences; present fields overwrite.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferencesPatch {
    /// Notifications flag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notifications: Option<bool>,
    /// Theme.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<Theme>,
}

impl Preferences {
    /// Shallow merge: only fields present in `patch` change.
    pub fn merge(&mut self, patch: PreferencesPatch) {
        if let Some(notifications) = patch.notifications {
            self.notifications = notifications;
        }
        if let Some(theme) = patch.theme {
            self.theme = theme;
        }
    }
}

/// Per-user usage counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageStats {
    /// Number of logos generated.
    pub logos_generated: i64,
    /// Number of brands created.
    pub brands_created: i64,
}
