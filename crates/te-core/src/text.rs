//! # Field Validators
//!
//! Length limits and colour syntax for the string fields of land-cover
//! classes. Lengths are counted in characters, not bytes, so localized
//! names are held to the same limit as ASCII ones.

use crate::error::ValidationError;

/// Reject `value` if it is longer than `max` characters.
pub fn validate_max_len(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
    let actual = value.chars().count();
    if actual > max {
        return Err(ValidationError::TooLong { field, max, actual });
    }
    Ok(())
}

/// Accept `#RGB` or `#RRGGBB` hex colours, either case.
pub fn validate_color(value: &str) -> Result<(), ValidationError> {
    let digits = match value.strip_prefix('#') {
        Some(d) => d,
        None => return Err(ValidationError::InvalidColor(value.to_string())),
    };
    let well_formed =
        matches!(digits.len(), 3 | 6) && digits.chars().all(|c| c.is_ascii_hexdigit());
    if !well_formed {
        return Err(ValidationError::InvalidColor(value.to_string()));
    }
    Ok(())
}
