//! Core types for BrandyBot.
//!
//! This crate provides the domain records shared by the store, the HTTP
//! service and the client SDK:
//!
//! - **Identifiers**: `UserId`, `BrandId`, `LogoId`
//! - **Users**: `User`, `Preferences`, `UsageStats`
//! - **Brands**: `Brand`, `BrandUpdate`, `MockupSet`
//! - **Guidelines**: `Guidelines`, `GeneratedGuidelines`
//! - **Logos**: `LogoHistory`, `LogoRequest`, `LogoStats`
//! - **Mockups**: `MockupKind`, `MockupTemplate`
//! - **Interview**: `Interview`, `Question`

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod brand;
pub mod error;
pub mod guidelines;
pub mod ids;
pub mod interview;
pub mod logo;
pub mod mockup;
pub mod user;
pub mod validate;

pub use brand::{
    Brand, BrandAssets, BrandStatus, BrandUpdate, LogoAssets, LogoAssetsUpdate, LogoVariants,
    MockupSet, NewBrand, PLACEHOLDER_LOGO_URL,
};
pub use error::{BrandyError, Result};
pub use guidelines::{ColorSpec, GeneratedGuidelines, Guidelines};
pub use ids::{BrandId, IdError, LogoId, UserId};
pub use interview::{Interview, InterviewAnswers, Question, Step};
pub use logo::{
    GenerationStatus, ImageFormat, ImageMetadata, LogoColors, LogoFonts, LogoHistory, LogoRequest,
    LogoStats, LogoStyle,
};
pub use mockup::{MockupKind, MockupTemplate};
pub use user::{
    AuthProvider, NewUser, Preferences, PreferencesPatch, ProfileUpdate, Role, Theme, UsageStats,
    User,
};
