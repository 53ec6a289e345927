//! Gift domain types.

use chrono::{DateTime, Utc};

use gift0_core::{GiftId, GiftName, GiftPrice, GiftUrl, ListId, Priority};

/// A gift entry on a list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gift {
    /// Unique gift ID.
    pub id: GiftId,
    /// List the gift belongs to.
    pub list_id: ListId,
    /// Product name.
    pub name: GiftName,
    /// Product page.
    pub url: GiftUrl,
    /// Display price, if known.
    pub price: Option<GiftPrice>,
    /// Priority band.
    pub priority: Priority,
    /// Whether someone has bought it.
    pub purchased: bool,
    /// When the gift was added.
    pub created_at: DateTime<Utc>,
    /// When the gift was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Fields for inserting a gift. New gifts are never purchased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGift {
    pub name: GiftName,
    pub url: GiftUrl,
    pub price: Option<GiftPrice>,
    pub priority: Priority,
}

/// Partial update of a gift.
///
/// `None` leaves a field untouched. `price: Some(None)` clears the price.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GiftUpdate {
    pub name: Option<GiftName>,
    pub url: Option<GiftUrl>,
    pub price: Option<Option<GiftPrice>>,
    pub priority: Option<Priority>,
}

impl GiftUpdate {
    /// Whether the update changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none() && self.url.is_none() && self.price.is_none() && self.priority.is_none()
    }

    /// Apply the provided fields to `gift` in place.
    pub fn apply_to(&self, gift: &mut Gift) {
        if let Some(name) = &self.name {
            gift.name = name.clone();
        }
        if let Some(url) = &self.url {
            gift.url = url.clone();
        }
        if let Some(price) = &self.price {
            gift.price = price.clone();
        }
        if let Some(priority) = self.priority {
            gift.priority = priority;
        }
    }
}
