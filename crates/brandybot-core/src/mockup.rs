//! Mockup templates.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::BrandyError;

/// Product templates a logo can be rendered onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MockupKind {
    /// Business card.
    BusinessCard,
    /// T-shirt.
    Tshirt,
    /// Office signage.
    Signage,
    /// Website hero.
    Website,
    /// Social media kit.
    SocialMedia,
}

impl MockupKind {
    /// Every template, in catalogue order.
    pub const ALL: [Self; 5] = [
        Self::BusinessCard,
        Self::Tshirt,
        Self::Signage,
        Self::Website,
        Self::SocialMedia,
    ];

    /// Template id as used on the wire.
    #[must_use]
    pub const fn id(&self) -> &'static str {
        match self {
            Self::BusinessCard => "businessCard",
            Self::Tshirt => "tshirt",
            Self::Signage => "signage",
            Self::Website => "website",
            Self::SocialMedia => "socialMedia",
        }
    }

    /// Catalogue entry for this template.
    #[must_use]
    pub const fn template(&self) -> MockupTemplate {
        let (name, category) = match self {
            Self::BusinessCard => ("Business Card", "print"),
            Self::Tshirt => ("T-Shirt", "merchandise"),
            Self::Signage => ("Office Signage", "outdoor"),
            Self::Website => ("Website Hero", "digital"),
            Self::SocialMedia => ("Social Media Kit", "digital"),
        };
        MockupTemplate {
            id: self.id(),
            name,
            category,
        }
    }
}

impl fmt::Display for MockupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for MockupKind {
    type Err = BrandyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.id() == s)
            .ok_or_else(|| BrandyError::InvalidMockupType {
                allowed: Self::ALL.map(|k| k.id()).join(", "),
            })
    }
}

/// A template in the mockup catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MockupTemplate {
    /// Template id.
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Category.
    pub category: &'static str,
}

/// The full template catalogue.
#[must_use]
pub fn templates() -> Vec<MockupTemplate> {
    MockupKind::ALL.iter().map(MockupKind::template).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_wire_ids() {
        assert_eq!("tshirt".parse::<MockupKind>(), Ok(MockupKind::Tshirt));
        assert_eq!(
            "socialMedia".parse::<MockupKind>(),
            Ok(MockupKind::SocialMedia)
        );
    }

    #[test]
    fn unknown_type_lists_allowed_ids() {
        let err = "mug".parse::<MockupKind>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid mockup type. Allowed: businessCard, tshirt, signage, website, socialMedia"
        );
    }

    #[test]
    fn catalogue_has_every_template() {
        let all = templates();
        assert_eq!(all.len(), 5);
        assert_eq!(all[0].name, "Business Card");
        assert_eq!(all[2].category, "outdoor");
    }

    #[test]
    fn serde_matches_wire_ids() {
        for kind in MockupKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.id()));
        }
    }
}
