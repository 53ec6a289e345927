//! Identity resolution: fingerprint to user.

use tracing::instrument;

use gift0_core::Fingerprint;

use super::ServiceError;
use crate::db::{RepositoryError, Store};
use crate::models::User;

/// The user behind a fingerprint, and whether it was created just now.
#[derive(Debug, Clone)]
pub struct ResolvedUser {
    pub user: User,
    pub is_new: bool,
}

/// Maps fingerprints to durable user records.
pub struct IdentityService<'a> {
    store: &'a dyn Store,
}

impl<'a> IdentityService<'a> {
    /// Create a new identity service.
    #[must_use]
    pub const fn new(store: &'a dyn Store) -> Self {
        Self { store }
    }

    /// Find the user for `fingerprint`, creating one on first sight.
    ///
    /// Two concurrent first requests for the same fingerprint both end up
    /// with the same user: the unique constraint rejects the losing insert
    /// and the loser reads the winner's row.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Repository` if storage fails.
    #[instrument(skip(self))]
    pub async fn resolve(&self, fingerprint: &Fingerprint) -> Result<ResolvedUser, ServiceError> {
        if let Some(user) = self.store.find_user_by_fingerprint(fingerprint).await? {
            return Ok(ResolvedUser {
                user,
                is_new: false,
            });
        }

        match self.store.insert_user(fingerprint).await {
            Ok(user) => {
                tracing::info!(user_id = %user.id, "new user");
                Ok(ResolvedUser {
                    user,
                    is_new: true,
                })
            }
            Err(RepositoryError::Conflict(_)) => {
                let user = self
                    .store
                    .find_user_by_fingerprint(fingerprint)
                    .await?
                    .ok_or(RepositoryError::NotFound)?;
                Ok(ResolvedUser {
                    user,
                    is_new: false,
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Find the user for `fingerprint` without creating one.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Repository` if storage fails.
    pub async fn lookup(&self, fingerprint: &Fingerprint) -> Result<Option<User>, ServiceError> {
        Ok(self.store.find_user_by_fingerprint(fingerprint).await?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;

    use gift0_core::{GiftId, ListId, ListName, ShareToken, UserId};

    use super::*;
    use crate::db::memory::MemoryStore;
    use crate::db::{GiftStore, ListStore, UserStore};
    use crate::models::{Gift, GiftList, GiftUpdate, NewGift};

    fn fingerprint() -> Fingerprint {
        Fingerprint::parse("fp-abc").unwrap()
    }

    #[tokio::test]
    async fn test_first_sight_creates_user() {
        let store = MemoryStore::new();
        let identity = IdentityService::new(&store);

        let first = identity.resolve(&fingerprint()).await.unwrap();
        assert!(first.is_new);

        let second = identity.resolve(&fingerprint()).await.unwrap();
        assert!(!second.is_new);
        assert_eq!(first.user.id, second.user.id);
        assert_eq!(store.user_count().await, 1);
    }

    #[tokio::test]
    async fn test_lookup_never_creates() {
        let store = MemoryStore::new();
        let identity = IdentityService::new(&store);

        assert!(identity.lookup(&fingerprint()).await.unwrap().is_none());
        assert_eq!(store.user_count().await, 0);

        let resolved = identity.resolve(&fingerprint()).await.unwrap();
        let found = identity.lookup(&fingerprint()).await.unwrap().unwrap();
        assert_eq!(found.id, resolved.user.id);
    }

    #[tokio::test]
    async fn test_concurrent_first_sight_yields_one_user() {
        let store = Arc::new(MemoryStore::new());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                tokio::spawn(async move {
                    IdentityService::new(store.as_ref())
                        .resolve(&fingerprint())
                        .await
                        .unwrap()
                })
            })
            .collect();

        let mut ids = Vec::new();
        let mut new_count = 0;
        for handle in handles {
            let resolved = handle.await.unwrap();
            ids.push(resolved.user.id);
            new_count += usize::from(resolved.is_new);
        }

        assert_eq!(new_count, 1);
        assert!(ids.windows(2).all(|w| w[0] == w[1]));
        assert_eq!(store.user_count().await, 1);
    }

    /// Store whose first lookup misses even though the user exists, the way
    /// a lookup racing another request's insert would.
    struct RacingStore {
        inner: MemoryStore,
        missed: tokio::sync::Mutex<bool>,
    }

    #[async_trait]
    impl UserStore for RacingStore {
        async fn find_user_by_fingerprint(
            &self,
            fingerprint: &Fingerprint,
        ) -> Result<Option<User>, RepositoryError> {
            let mut missed = self.missed.lock().await;
            if !*missed {
                *missed = true;
                return Ok(None);
            }
            self.inner.find_user_by_fingerprint(fingerprint).await
        }

        async fn insert_user(&self, fingerprint: &Fingerprint) -> Result<User, RepositoryError> {
            self.inner.insert_user(fingerprint).await
        }
    }

    #[async_trait]
    impl ListStore for RacingStore {
        async fn insert_list(
            &self,
            owner_id: UserId,
            name: &ListName,
            share_token: &ShareToken,
        ) -> Result<GiftList, RepositoryError> {
            self.inner.insert_list(owner_id, name, share_token).await
        }
        async fn find_list(&self, id: ListId) -> Result<Option<GiftList>, RepositoryError> {
            self.inner.find_list(id).await
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
        async fn rename_list(
            &self,
            id: ListId,
            name: &ListName,
        ) -> Result<GiftList, RepositoryError> {
            self.inner.rename_list(id, name).await
        }
        async fn delete_list(&self, id: ListId) -> Result<(), RepositoryError> {
            self.inner.delete_list(id).await
        }
    }

    #[async_trait]
    impl GiftStore for RacingStore {
        async fn insert_gift(
            &self,
            list_id: ListId,
            gift: &NewGift,
        ) -> Result<Gift, RepositoryError> {
            self.inner.insert_gift(list_id, gift).await
        }
        async fn find_gift(&self, id: GiftId) -> Result<Option<Gift>, RepositoryError> {
            self.inner.find_gift(id).await
        }
        async fn gifts_by_lists(&self, list_ids: &[ListId]) -> Result<Vec<Gift>, RepositoryError> {
            self.inner.gifts_by_lists(list_ids).await
        }
        async fn update_gift(
            &self,
            id: GiftId,
            update: &GiftUpdate,
        ) -> Result<Gift, RepositoryError> {
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

    impl Store for RacingStore {}

    #[tokio::test]
    async fn test_lost_insert_race_reads_existing_user() {
        let inner = MemoryStore::new();
        let existing = inner.insert_user(&fingerprint()).await.unwrap();
        let store = RacingStore {
            inner,
            missed: tokio::sync::Mutex::new(false),
        };

        let resolved = IdentityService::new(&store)
            .resolve(&fingerprint())
            .await
            .unwrap();

        assert!(!resolved.is_new);
        assert_eq!(resolved.user.id, existing.id);
        assert_eq!(store.inner.user_count().await, 1);
    }
}
