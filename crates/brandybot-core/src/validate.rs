//! Field validation helpers shared by the record types.

use crate::error::{BrandyError, Result};

/// Trim `value` and require it to be non-empty and at most `max` characters.
///
/// # Errors
///
/// Returns `MissingField` for blank input and `TooLong` when over `max`.
pub fn required(field: &'static str, value: &str, max: usize) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(BrandyError::MissingField { field });
    }
    bounded(field, trimmed, max)
}

/// Trim `value` and require it to be at most `max` characters.
///
/// # Errors
///
/// Returns `TooLong` when the trimmed value is over `max` characters.
pub fn bounded(field: &'static str, value: &str, max: usize) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.chars().count() > max {
        return Err(BrandyError::TooLong { field, max });
    }
    Ok(trimmed.to_string())
}

/// Normalise an email address: trimmed, lowercased, shaped like `a@b.c`.
///
/// # Errors
///
/// Returns `InvalidEmail` when the address has whitespace, no `@`, or no dot
/// in the domain part.
pub fn email(value: &str) -> Result<String> {
    let normalized = value.trim().to_lowercase();
    if normalized.chars().any(char::is_whitespace) {
        return Err(BrandyError::InvalidEmail);
    }
    let (local, domain) = normalized
        .split_once('@')
        .ok_or(BrandyError::InvalidEmail)?;
    let dot = domain.find('.').ok_or(BrandyError::InvalidEmail)?;
    if local.is_empty() || dot == 0 || dot + 1 == domain.len() {
        return Err(BrandyError::InvalidEmail);
    }
    Ok(normalized)
}
