//! Gift list domain types.

use chrono::{DateTime, Utc};

use gift0_core::{ListId, ListName, ShareToken, UserId};

use super::Gift;

/// A named gift list owned by one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GiftList {
    /// Unique list ID.
    pub id: ListId,
    /// Display name.
    pub name: ListName,
    /// Owning user.
    pub owner_id: UserId,
    /// Public share token, unique across all lists.
    pub share_token: ShareToken,
    /// When the list was created.
    pub created_at: DateTime<Utc>,
    /// When the list was last updated.
    pub updated_at: DateTime<Utc>,
}

impl GiftList {
    /// Whether `user_id` owns this list.
    #[must_use]
    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.owner_id == user_id
    }
}

/// A list together with its gifts, newest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListWithGifts {
    pub list: GiftList,
    pub gifts: Vec<Gift>,
}
