//! Gift operations.

use tracing::instrument;

use gift0_core::{GiftId, ListId, ShareToken, UserId};

use super::{ListService, ServiceError};
use crate::db::Store;
use crate::models::{Gift, GiftUpdate, NewGift};

/// Gift operations. Owner operations check the parent list's owner.
pub struct GiftService<'a> {
    store: &'a dyn Store,
}

impl<'a> GiftService<'a> {
    /// Create a new gift service.
    #[must_use]
    pub const fn new(store: &'a dyn Store) -> Self {
        Self { store }
    }

    /// Add a gift to a list the acting user owns.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Unauthorized` if the list is missing or owned
    /// by someone else.
    #[instrument(skip(self, gift), fields(gift_name = %gift.name))]
    pub async fn add(
        &self,
        list_id: ListId,
        acting: UserId,
        gift: &NewGift,
    ) -> Result<Gift, ServiceError> {
        ListService::new(self.store).owned(list_id, acting).await?;
        let gift = self
            .store
            .insert_gift(list_id, gift)
            .await
            .map_err(ServiceError::unauthorized_if_gone)?;
        tracing::info!(gift_id = %gift.id, "gift added");
        Ok(gift)
    }

    /// Apply a partial update to a gift the acting user owns.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Unauthorized` if the gift is missing or its
    /// list is owned by someone else.
    #[instrument(skip(self, update))]
    pub async fn update(
        &self,
        id: GiftId,
        acting: UserId,
        update: &GiftUpdate,
    ) -> Result<Gift, ServiceError> {
        self.owned(id, acting).await?;
        self.store
            .update_gift(id, update)
            .await
            .map_err(ServiceError::unauthorized_if_gone)
    }

    /// Flip the purchased flag on a gift the acting user owns.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Unauthorized` if the gift is missing or its
    /// list is owned by someone else.
    #[instrument(skip(self))]
    pub async fn toggle_purchased(&self, id: GiftId, acting: UserId) -> Result<Gift, ServiceError> {
        let gift = self.owned(id, acting).await?;
        self.store
            .toggle_purchased(id, gift.list_id)
            .await?
            .ok_or(ServiceError::Unauthorized)
    }

    /// Flip the purchased flag through a list's public share token.
    ///
    /// Nothing changes unless the gift is on the shared list.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::ListNotFound` for an unknown token and
    /// `ServiceError::GiftNotInList` if the gift is not on that list.
    #[instrument(skip(self))]
    pub async fn toggle_purchased_shared(
        &self,
        id: GiftId,
        token: &ShareToken,
    ) -> Result<Gift, ServiceError> {
        let list = self
            .store
            .find_list_by_share_token(token)
            .await?
            .ok_or(ServiceError::ListNotFound)?;

        self.store
            .toggle_purchased(id, list.id)
            .await?
            .ok_or(ServiceError::GiftNotInList)
    }

    /// Delete a gift the acting user owns.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Unauthorized` if the gift is missing or its
    /// list is owned by someone else.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: GiftId, acting: UserId) -> Result<(), ServiceError> {
        self.owned(id, acting).await?;
        self.store
            .delete_gift(id)
            .await
            .map_err(ServiceError::unauthorized_if_gone)?;
        Ok(())
    }

    /// Load a gift and check that `acting` owns its list.
    async fn owned(&self, id: GiftId, acting: UserId) -> Result<Gift, ServiceError> {
        let gift = self
            .store
            .find_gift(id)
            .await?
            .ok_or(ServiceError::Unauthorized)?;
        ListService::new(self.store)
            .owned(gift.list_id, acting)
            .await?;
        Ok(gift)
    }
}
