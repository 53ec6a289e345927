//! A store whose rows disappear right after they are read, the way a
//! concurrent delete racing an ownership check would look.

use async_trait::async_trait;

use gift0_core::{Fingerprint, GiftId, ListId, ListName, ShareToken, UserId};

use crate::db::memory::MemoryStore;
use crate::db::{GiftStore, ListStore, RepositoryError, Store, UserStore};
use crate::models::{Gift, GiftList, GiftUpdate, NewGift, User};

/// Which kind of row disappears once read.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Vanish {
    Lists,
    Gifts,
}

pub struct VanishingStore {
    pub inner: MemoryStore,
    pub vanish: Vanish,
}

#[async_trait]
impl UserStore for VanishingStore {
    async fn find_user_by_fingerprint(
        &self,
        fingerprint: &Fingerprint,
    ) -> Result<Option<User>, RepositoryError> {
        self.inner.find_user_by_fingerprint(fingerprint).await
    }

    async fn insert_user(&self, fingerprint: &Fingerprint) -> Result<User, RepositoryError> {
        self.inner.insert_user(fingerprint).await
    }
}

#[async_trait]
impl ListStore for VanishingStore {
    async fn insert_list(
        &self,
        owner_id: UserId,
        name: &ListName,
        share_token: &ShareToken,
    ) -> Result<GiftList, RepositoryError> {
        self.inner.insert_list(owner_id, name, share_token).await
    }

    async fn find_list(&self, id: ListId) -> Result<Option<GiftList>, RepositoryError> {
        let list = self.inner.find_list(id).await?;
        if list.is_some() && self.vanish == Vanish::Lists {
            self.inner.delete_list(id).await?;
        }
        Ok(list)
    }

    async fn find_list_by_share_token(
        &self,
        share_token: &ShareToken,
    ) -> Result<Option<GiftList>, RepositoryError> {
        self.inner.find_list_by_share_token(share_token).await
    }

    async fn lists_by_owner(&self, owner_id: UserId) -> Result<Vec<GiftList>, RepositoryError> {
        self.inner.lists_by_owner(owner_id).await
    }

    async fn rename_list(&self, id: ListId, name: &ListName) -> Result<GiftList, RepositoryError> {
        self.inner.rename_list(id, name).await
    }

    async fn delete_list(&self, id: ListId) -> Result<(), RepositoryError> {
        self.inner.delete_list(id).await
    }
}

#[async_trait]
impl GiftStore for VanishingStore {
    async fn insert_gift(&self, list_id: ListId, gift: &NewGift) -> Result<Gift, RepositoryError> {
        self.inner.insert_gift(list_id, gift).await
    }

    async fn find_gift(&self, id: GiftId) -> Result<Option<Gift>, RepositoryError> {
        let gift = self.inner.find_gift(id).await?;
        if gift.is_some() && self.vanish == Vanish::Gifts {
            self.inner.delete_gift(id).await?;
        }
        Ok(gift)
    }

    async fn gifts_by_lists(&self, list_ids: &[ListId]) -> Result<Vec<Gift>, RepositoryError> {
        self.inner.gifts_by_lists(list_ids).await
    }

    async fn update_gift(&self, id: GiftId, update: &GiftUpdate) -> Result<Gift, RepositoryError> {
        self.inner.update_gift(id, update).await
    }

    async fn toggle_purchased(
        &self,
        id: GiftId,
        list_id: ListId,
    ) -> Result<Option<Gift>, RepositoryError> {
        self.inner.toggle_purchased(id, list_id).await
    }

    async fn delete_gift(&self, id: GiftId) -> Result<(), RepositoryError> {
        self.inner.delete_gift(id).await
    }
}

impl Store for VanishingStore {}
