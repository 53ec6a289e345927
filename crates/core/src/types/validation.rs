//! Field validation errors shared by all validated newtypes.

use thiserror::Error;

/// Errors produced when parsing user-supplied fields.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The value is empty (after trimming).
    #[error("{field} cannot be empty")]
    Empty {
        /// Name of the offending field.
        field: &'static str,
    },
    /// The value exceeds its maximum length in characters.
    #[error("{field} must be at most {max} characters")]
    TooLong {
        /// Name of the offending field.
        field: &'static str,
        /// Maximum allowed length.
        max: usize,
    },
    /// The value contains characters that are not allowed.
    #[error("{field} contains invalid characters")]
    InvalidCharacters {
        /// Name of the offending field.
        field: &'static str,
    },
    /// The value is not an absolute http(s) URL.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    /// The value is not one of `high`, `medium`, `low`.
    #[error("invalid priority: {0}")]
    InvalidPriority(String),
}

/// Trim `value` and check it is non-empty and at most `max` characters.
pub(crate) fn bounded_text(
    value: &str,
    field: &'static str,
    max: usize,
) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty { field });
    }
    if trimmed.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(trimmed.to_owned())
}
