//! Validated list and gift fields.

use core::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

use super::validation::{ValidationError, bounded_text};

/// Name of a gift list (1-200 characters).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct ListName(String);

impl ListName {
    /// Maximum length of a list name.
    pub const MAX_LENGTH: usize = 200;

    /// Parse and trim a list name.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is blank or longer than 200 characters.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        bounded_text(s, "list name", Self::MAX_LENGTH).map(Self)
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Name of a gift (1-500 characters).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct GiftName(String);

impl GiftName {
    /// Maximum length of a gift name.
    pub const MAX_LENGTH: usize = 500;

    /// Parse and trim a gift name.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is blank or longer than 500 characters.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        bounded_text(s, "gift name", Self::MAX_LENGTH).map(Self)
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Product URL of a gift.
///
/// Must be an absolute `http` or `https` URL with a host. The trimmed input
/// is kept as given rather than re-serialized.
///
/// ```
/// use gift0_core::GiftUrl;
///
/// assert!(GiftUrl::parse("https://shop.example/p/123").is_ok());
/// assert!(GiftUrl::parse("ftp://shop.example/file").is_err());
/// assert!(GiftUrl::parse("not a url").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct GiftUrl(String);

impl GiftUrl {
    /// Maximum length of a gift URL.
    pub const MAX_LENGTH: usize = 2048;

    /// Parse a product URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is blank, too long, or not an absolute
    /// http(s) URL with a host.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        let trimmed = bounded_text(s, "url", Self::MAX_LENGTH)?;
        let parsed = Url::parse(&trimmed).map_err(|e| ValidationError::InvalidUrl(e.to_string()))?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ValidationError::InvalidUrl(format!(
                "unsupported scheme '{}'",
                parsed.scheme()
            )));
        }
        if parsed.host_str().is_none_or(str::is_empty) {
            return Err(ValidationError::InvalidUrl("missing host".to_owned()));
        }

        Ok(Self(trimmed))
    }

    /// Returns the URL as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

macro_rules! impl_display {
    ($($name:ident),*) => {
        $(
            impl fmt::Display for $name {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(&self.0)
                }
            }
        )*
    };
}

impl_display!(ListName, GiftName, GiftUrl);
