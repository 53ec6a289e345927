//! Display prices for gifts.
//!
//! Prices come from scraped product pages in whatever shape the shop uses
//! (`$1,299.99`, `45,00 €`, `USD 20`). They are stored verbatim and only
//! interpreted numerically when deriving a [`Priority`](super::Priority).

use core::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::validation::ValidationError;

/// A currency-agnostic display price.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GiftPrice(String);

impl GiftPrice {
    /// Maximum length of a stored price string.
    pub const MAX_LENGTH: usize = 64;

    /// Parse an optional price.
    ///
    /// Blank input means "no price" and yields `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the price is longer than 64 characters.
    pub fn parse(s: &str) -> Result<Option<Self>, ValidationError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        if trimmed.chars().count() > Self::MAX_LENGTH {
            return Err(ValidationError::TooLong {
                field: "price",
                max: Self::MAX_LENGTH,
            });
        }
        Ok(Some(Self(trimmed.to_owned())))
    }

    /// Returns the price exactly as stored.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Best-effort numeric amount, ignoring currency symbols and codes.
    ///
    /// Only the first number in the string is considered, so ranges such as
    /// `$19.99 - $29.99` yield the lower bound. Returns `None` when no number
    /// can be found.
    ///
    /// ```
    /// use gift0_core::GiftPrice;
    /// use rust_decimal::Decimal;
    ///
    /// let price = GiftPrice::parse("$1,299.99").unwrap().unwrap();
    /// assert_eq!(price.amount(), Some(Decimal::new(129_999, 2)));
    ///
    /// let euro = GiftPrice::parse("45,00 €").unwrap().unwrap();
    /// assert_eq!(euro.amount(), Some(Decimal::new(4500, 2)));
    /// ```
    #[must_use]
    pub fn amount(&self) -> Option<Decimal> {
        let number: String = self
            .0
            .chars()
            .skip_while(|c| !c.is_ascii_digit())
            .take_while(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
            .collect();
        let number = number.trim_end_matches(['.', ',']);
        if number.is_empty() {
            return None;
        }
        Decimal::from_str(&normalize_separators(number)).ok()
    }
}

/// Turn a number using `.`/`,` as thousands or decimal separators into
/// plain `1234.56` form.
fn normalize_separators(number: &str) -> String {
    let last_dot = number.rfind('.');
    let last_comma = number.rfind(',');

    let decimal_sep = match (last_dot, last_comma) {
        (Some(dot), Some(comma)) => Some(if dot > comma { '.' } else { ',' }),
        (Some(_), None) => (number.matches('.').count() == 1).then_some('.'),
        (None, Some(comma)) => {
            let decimals = number.len() - comma - 1;
            (number.matches(',').count() == 1 && decimals != 3).then_some(',')
        }
        (None, None) => None,
    };

    number
        .chars()
        .filter_map(|c| match c {
            '.' | ',' if Some(c) == decimal_sep => Some('.'),
            '.' | ',' => None,
            digit => Some(digit),
        })
        .collect()
}

impl fmt::Display for GiftPrice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
