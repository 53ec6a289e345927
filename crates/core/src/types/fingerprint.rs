//! Anonymous client fingerprint.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::validation::ValidationError;

/// An opaque, client-generated identifier that stands in for a login.
///
/// The fingerprint is the only basis for resolving a user. Its content is
/// never interpreted, only compared.
///
/// ## Constraints
///
/// - Length: 1-255 characters after trimming
/// - No control characters
///
/// ## Examples
///
/// ```
/// use gift0_core::Fingerprint;
///
/// assert!(Fingerprint::parse("b1946ac92492d2347c6235b4d2611184").is_ok());
/// assert!(Fingerprint::parse("   ").is_err());
/// assert!(Fingerprint::parse("tab\there").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Maximum length of a fingerprint.
    pub const MAX_LENGTH: usize = 255;

    /// Parse a `Fingerprint` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is blank, longer than 255 characters,
    /// or contains control characters.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        const FIELD: &str = "fingerprint";

        let value = super::validation::bounded_text(s, FIELD, Self::MAX_LENGTH)?;
        if value.chars().any(char::is_control) {
            return Err(ValidationError::InvalidCharacters { field: FIELD });
        }
        Ok(Self(value))
    }

    /// Returns the fingerprint as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Fingerprint {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims_whitespace() {
        let fp = Fingerprint::parse("  abc123  ").expect("valid");
        assert_eq!(fp.as_str(), "abc123");
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert_eq!(
            Fingerprint::parse(""),
            Err(ValidationError::Empty {
                field: "fingerprint"
            })
        );
    }

    #[test]
    fn test_parse_rejects_too_long() {
        let long = "f".repeat(Fingerprint::MAX_LENGTH + 1);
        assert!(matches!(
            Fingerprint::parse(&long),
            Err(ValidationError::TooLong { max: 255, .. })
        ));
    }

    #[test]
    fn test_parse_accepts_max_length() {
        let max = "f".repeat(Fingerprint::MAX_LENGTH);
        assert!(Fingerprint::parse(&max).is_ok());
    }

    #[test]
    fn test_parse_rejects_control_characters() {
        assert!(matches!(
            Fingerprint::parse("abc\u{0}def"),
            Err(ValidationError::InvalidCharacters { .. })
        ));
    }
}
