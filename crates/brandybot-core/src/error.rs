//! Error types for BrandyBot domain operations.

use crate::ids::IdError;

/// Result type for BrandyBot domain operations.
pub type Result<T> = std::result::Result<T, BrandyError>;

/// Errors raised while validating or mutating domain records.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BrandyError {
    /// A required field was missing or blank.
    #[error("{field} is required")]
    MissingField {
        /// Name of the missing field.
        field: &'static str,
    },

    /// A field exceeded its maximum length.
    #[error("{field} cannot exceed {max} characters")]
    TooLong {
        /// Name of the offending field.
        field: &'static str,
        /// Maximum allowed length in characters.
        max: usize,
    },

    /// A rating outside `1..=5`.
    #[error("Please provide a rating between 1 and 5")]
    InvalidRating,

    /// A malformed email address.
    #[error("Please provide a valid email address")]
    InvalidEmail,

    /// An unknown mockup template.
    #[error("Invalid mockup type. Allowed: {allowed}")]
    InvalidMockupType {
        /// Comma-separated list of accepted template ids.
        allowed: String,
    },

    /// A colour that is not `#RRGGBB` / `#RGB`.
    #[error("invalid hex colour: {0}")]
    InvalidColor(String),

    /// The interview already has all answers.
    #[error("interview is already complete")]
    InterviewComplete,

    /// Invalid identifier.
    #[error("invalid identifier: {0}")]
    InvalidId(#[from] IdError),
}
