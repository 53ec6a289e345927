//! JSON payloads returned by the API.

use chrono::{DateTime, Utc};
use serde::Serialize;

use gift0_core::{GiftId, GiftName, GiftPrice, GiftUrl, ListId, ListName, Priority, ShareToken, UserId};

use crate::config::ServerConfig;
use crate::models::{Gift, GiftList, ListWithGifts};

/// A gift as returned by the API.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GiftView {
    pub id: GiftId,
    pub list_id: ListId,
    pub name: GiftName,
    pub url: GiftUrl,
    pub price: Option<GiftPrice>,
    pub priority: Priority,
    pub priority_label: &'static str,
    pub purchased: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Gift> for GiftView {
    fn from(gift: Gift) -> Self {
        Self {
            id: gift.id,
            list_id: gift.list_id,
            name: gift.name,
            url: gift.url,
            price: gift.price,
            priority: gift.priority,
            priority_label: gift.priority.label(),
            purchased: gift.purchased,
            created_at: gift.created_at,
            updated_at: gift.updated_at,
        }
    }
}

/// A list with its gifts as returned by the API.
///
/// `ownerId` is left out of shared views, and `canEdit` is only present on
/// views that were computed for a particular caller.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListView {
    pub id: ListId,
    pub name: ListName,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<UserId>,
    pub share_token: ShareToken,
    pub share_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub gifts: Vec<GiftView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub can_edit: Option<bool>,
}

impl ListView {
    /// View for the list's owner.
    #[must_use]
    pub fn owned(list: ListWithGifts, config: &ServerConfig) -> Self {
        let owner_id = list.list.owner_id;
        Self {
            owner_id: Some(owner_id),
            ..Self::shared(list, config)
        }
    }

    /// View for anyone holding the share link.
    #[must_use]
    pub fn shared(list: ListWithGifts, config: &ServerConfig) -> Self {
        let ListWithGifts { list, gifts } = list;
        let share_url = config.share_url(list.share_token.as_str());
        Self {
            id: list.id,
            name: list.name,
            owner_id: None,
            share_token: list.share_token,
            share_url,
            created_at: list.created_at,
            updated_at: list.updated_at,
            gifts: gifts.into_iter().map(GiftView::from).collect(),
            can_edit: None,
        }
    }

    /// View of a list that has just been created and has no gifts yet.
    #[must_use]
    pub fn created(list: GiftList, config: &ServerConfig) -> Self {
        Self::owned(
            ListWithGifts {
                list,
                gifts: Vec::new(),
            },
            config,
        )
    }

    /// Record whether the caller may edit the list.
    #[must_use]
    pub fn with_can_edit(mut self, can_edit: bool) -> Self {
        self.can_edit = Some(can_edit);
        self
    }
}
