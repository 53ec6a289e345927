//! Gift priority.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::validation::ValidationError;

/// How much a gift "costs" the giver, on a three-step scale.
///
/// Assigned heuristically from price by the extraction adapter, or chosen by
/// the list owner when adding a gift by hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "priority", rename_all = "lowercase")
)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// $200 and up.
    High,
    /// $50 up to $200.
    #[default]
    Medium,
    /// Under $50.
    Low,
}

impl Priority {
    /// Lower bound (inclusive) of the `high` band.
    pub const HIGH_THRESHOLD: Decimal = Decimal::from_parts(200, 0, 0, false, 0);

    /// Lower bound (inclusive) of the `medium` band.
    pub const MEDIUM_THRESHOLD: Decimal = Decimal::from_parts(50, 0, 0, false, 0);

    /// Derive a priority from a numeric price.
    ///
    /// ```
    /// use gift0_core::Priority;
    /// use rust_decimal::Decimal;
    ///
    /// assert_eq!(Priority::from_price(Decimal::new(19999, 2)), Priority::Medium);
    /// assert_eq!(Priority::from_price(Decimal::new(200, 0)), Priority::High);
    /// assert_eq!(Priority::from_price(Decimal::new(4999, 2)), Priority::Low);
    /// ```
    #[must_use]
    pub fn from_price(amount: Decimal) -> Self {
        if amount >= Self::HIGH_THRESHOLD {
            Self::High
        } else if amount >= Self::MEDIUM_THRESHOLD {
            Self::Medium
        } else {
            Self::Low
        }
    }

    /// Wire/database name of the priority.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    /// Human-facing label shown next to a gift.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Low => "Almost Free",
            Self::Medium => "Budget Friendly",
            Self::High => "Financial Regret",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Priority {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            _ => Err(ValidationError::InvalidPriority(s.to_owned())),
        }
    }
}
