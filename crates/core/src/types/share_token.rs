//! Public share tokens for gift lists.

use core::fmt;

use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use super::validation::ValidationError;

/// Symbols used for generated tokens.
///
/// Url-safe and free of look-alike characters (`0`/`O`, `1`/`l`/`I`).
const ALPHABET: &[u8] = b"23456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// A short, unguessable public identifier for a gift list.
///
/// Possession of the token grants read access to the list and the ability to
/// toggle a gift's purchased flag, nothing more.
///
/// ```
/// use gift0_core::ShareToken;
///
/// let token = ShareToken::generate();
/// assert_eq!(token.as_str().len(), ShareToken::GENERATED_LENGTH);
/// assert!(ShareToken::parse(token.as_str()).is_ok());
/// assert!(ShareToken::parse("../etc/passwd").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct ShareToken(String);

impl ShareToken {
    /// Length of freshly generated tokens.
    pub const GENERATED_LENGTH: usize = 12;

    /// Longest token accepted by [`ShareToken::parse`].
    pub const MAX_LENGTH: usize = 64;

    /// Generate a fresh random token.
    #[must_use]
    pub fn generate() -> Self {
        let mut rng = rand::rng();
        let token = (0..Self::GENERATED_LENGTH)
            .filter_map(|_| ALPHABET.choose(&mut rng))
            .map(|&b| char::from(b))
            .collect();
        Self(token)
    }

    /// Parse a token received from a client.
    ///
    /// Lookups accept any url-safe token (`[A-Za-z0-9_-]`), not only the
    /// generated alphabet.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is empty, too long, or not url-safe.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        const FIELD: &str = "share token";

        if s.is_empty() {
            return Err(ValidationError::Empty { field: FIELD });
        }
        if s.len() > Self::MAX_LENGTH {
            return Err(ValidationError::TooLong {
                field: FIELD,
                max: Self::MAX_LENGTH,
            });
        }
        if !s
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
        {
            return Err(ValidationError::InvalidCharacters { field: FIELD });
        }
        Ok(Self(s.to_owned()))
    }

    /// Returns the token as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ShareToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
