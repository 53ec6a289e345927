//! In-memory [`Store`](super::Store) for tests and local tooling.
//!
//! Mirrors the `PostgreSQL` constraints the services rely on: unique
//! fingerprints, unique share tokens, cascade deletes, and newest-first
//! ordering.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use gift0_core::{Fingerprint, GiftId, ListId, ListName, ShareToken, UserId};

use super::{GiftStore, ListStore, RepositoryError, Store, UserStore};
use crate::models::{Gift, GiftList, GiftUpdate, NewGift, User};

/// Rows kept in insertion order, which is also `created_at` order.
#[derive(Default)]
struct Tables {
    users: Vec<User>,
    lists: Vec<GiftList>,
    gifts: Vec<Gift>,
}

/// A [`Store`](super::Store) backed by process memory.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of users.
    pub async fn user_count(&self) -> usize {
        self.tables.read().await.users.len()
    }

    /// Number of lists across all users.
    pub async fn list_count(&self) -> usize {
        self.tables.read().await.lists.len()
    }

    /// Number of gifts across all lists.
    pub async fn gift_count(&self) -> usize {
        self.tables.read().await.gifts.len()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_user_by_fingerprint(
        &self,
        fingerprint: &Fingerprint,
    ) -> Result<Option<User>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .iter()
            .find(|u| &u.fingerprint == fingerprint)
            .cloned())
    }

    async fn insert_user(&self, fingerprint: &Fingerprint) -> Result<User, RepositoryError> {
        let mut tables = self.tables.write().await;
        if tables.users.iter().any(|u| &u.fingerprint == fingerprint) {
            return Err(RepositoryError::Conflict(
                "fingerprint already exists".to_owned(),
            ));
        }

        let created_at = Utc::now();
        let user = User {
            id: UserId::generate(),
            fingerprint: fingerprint.clone(),
            created_at,
            updated_at: created_at,
        };
        tables.users.push(user.clone());
        Ok(user)
    }
}

#[async_trait]
impl ListStore for MemoryStore {
    async fn insert_list(
        &self,
        owner_id: UserId,
        name: &ListName,
        share_token: &ShareToken,
    ) -> Result<GiftList, RepositoryError> {
        let mut tables = self.tables.write().await;
        if tables.lists.iter().any(|l| &l.share_token == share_token) {
            return Err(RepositoryError::Conflict(
                "share token already exists".to_owned(),
            ));
        }
        if !tables.users.iter().any(|u| u.id == owner_id) {
            return Err(RepositoryError::NotFound);
        }

        let created_at = Utc::now();
        let list = GiftList {
            id: ListId::generate(),
            name: name.clone(),
            owner_id,
            share_token: share_token.clone(),
            created_at,
            updated_at: created_at,
        };
        tables.lists.push(list.clone());
        Ok(list)
    }

    async fn find_list(&self, id: ListId) -> Result<Option<GiftList>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables.lists.iter().find(|l| l.id == id).cloned())
    }

    async fn find_list_by_share_token(
        &self,
        share_token: &ShareToken,
    ) -> Result<Option<GiftList>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .lists
            .iter()
            .find(|l| &l.share_token == share_token)
            .cloned())
    }

    async fn lists_by_owner(&self, owner_id: UserId) -> Result<Vec<GiftList>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .lists
            .iter()
            .rev()
            .filter(|l| l.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn rename_list(&self, id: ListId, name: &ListName) -> Result<GiftList, RepositoryError> {
        let mut tables = self.tables.write().await;
        let list = tables
            .lists
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or(RepositoryError::NotFound)?;

        list.name = name.clone();
        list.updated_at = Utc::now();
        Ok(list.clone())
    }

    async fn delete_list(&self, id: ListId) -> Result<(), RepositoryError> {
        let mut tables = self.tables.write().await;
        let before = tables.lists.len();
        tables.lists.retain(|l| l.id != id);
        if tables.lists.len() == before {
            return Err(RepositoryError::NotFound);
        }
        tables.gifts.retain(|g| g.list_id != id);
        Ok(())
    }
}

#[async_trait]
impl GiftStore for MemoryStore {
    async fn insert_gift(&self, list_id: ListId, gift: &NewGift) -> Result<Gift, RepositoryError> {
        let mut tables = self.tables.write().await;
        if !tables.lists.iter().any(|l| l.id == list_id) {
            return Err(RepositoryError::NotFound);
        }

        let created_at = Utc::now();
        let gift = Gift {
            id: GiftId::generate(),
            list_id,
            name: gift.name.clone(),
            url: gift.url.clone(),
            price: gift.price.clone(),
            priority: gift.priority,
            purchased: false,
            created_at,
            updated_at: created_at,
        };
        tables.gifts.push(gift.clone());
        Ok(gift)
    }

    async fn find_gift(&self, id: GiftId) -> Result<Option<Gift>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables.gifts.iter().find(|g| g.id == id).cloned())
    }

    async fn gifts_by_lists(&self, list_ids: &[ListId]) -> Result<Vec<Gift>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .gifts
            .iter()
            .rev()
            .filter(|g| list_ids.contains(&g.list_id))
            .cloned()
            .collect())
    }

    async fn update_gift(&self, id: GiftId, update: &GiftUpdate) -> Result<Gift, RepositoryError> {
        let mut tables = self.tables.write().await;
        let gift = tables
            .gifts
            .iter_mut()
            .find(|g| g.id == id)
            .ok_or(RepositoryError::NotFound)?;

        update.apply_to(gift);
        gift.updated_at = Utc::now();
        Ok(gift.clone())
    }

    async fn toggle_purchased(
        &self,
        id: GiftId,
        list_id: ListId,
    ) -> Result<Option<Gift>, RepositoryError> {
        let mut tables = self.tables.write().await;
        let Some(gift) = tables
            .gifts
            .iter_mut()
            .find(|g| g.id == id && g.list_id == list_id)
        else {
            return Ok(None);
        };

        gift.purchased = !gift.purchased;
        gift.updated_at = Utc::now();
        Ok(Some(gift.clone()))
    }

    async fn delete_gift(&self, id: GiftId) -> Result<(), RepositoryError> {
        let mut tables = self.tables.write().await;
        let before = tables.gifts.len();
        tables.gifts.retain(|g| g.id != id);
        if tables.gifts.len() == before {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

impl Store for MemoryStore {}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use gift0_core::{GiftName, GiftUrl, Priority};

    use super::*;

    fn fingerprint(s: &str) -> Fingerprint {
        Fingerprint::parse(s).unwrap()
    }

    fn new_gift(name: &str) -> NewGift {
        NewGift {
            name: GiftName::parse(name).unwrap(),
            url: GiftUrl::parse("https://shop.example/item").unwrap(),
            price: None,
            priority: Priority::Medium,
        }
    }

    #[tokio::test]
    async fn test_duplicate_fingerprint_conflicts() {
        let store = MemoryStore::new();
        store.insert_user(&fingerprint("fp-1")).await.unwrap();

        let err = store.insert_user(&fingerprint("fp-1")).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
        assert_eq!(store.user_count().await, 1);
    }

    #[tokio::test]
    async fn test_duplicate_share_token_conflicts() {
        let store = MemoryStore::new();
        let user = store.insert_user(&fingerprint("fp-1")).await.unwrap();
        let token = ShareToken::generate();
        let name = ListName::parse("Birthday").unwrap();

        store.insert_list(user.id, &name, &token).await.unwrap();
        let err = store.insert_list(user.id, &name, &token).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_delete_list_cascades_to_gifts() {
        let store = MemoryStore::new();
        let user = store.insert_user(&fingerprint("fp-1")).await.unwrap();
        let list = store
            .insert_list(
                user.id,
                &ListName::parse("Birthday").unwrap(),
                &ShareToken::generate(),
            )
            .await
            .unwrap();
        store.insert_gift(list.id, &new_gift("Socks")).await.unwrap();

        store.delete_list(list.id).await.unwrap();
        assert_eq!(store.gift_count().await, 0);
    }

    #[tokio::test]
    async fn test_toggle_requires_matching_list() {
        let store = MemoryStore::new();
        let user = store.insert_user(&fingerprint("fp-1")).await.unwrap();
        let name = ListName::parse("Birthday").unwrap();
        let list = store
            .insert_list(user.id, &name, &ShareToken::generate())
            .await
            .unwrap();
        let other = store
            .insert_list(user.id, &name, &ShareToken::generate())
            .await
            .unwrap();
        let gift = store.insert_gift(list.id, &new_gift("Socks")).await.unwrap();

        assert!(store.toggle_purchased(gift.id, other.id).await.unwrap().is_none());
        let stored = store.find_gift(gift.id).await.unwrap().unwrap();
        assert!(!stored.purchased);

        let toggled = store.toggle_purchased(gift.id, list.id).await.unwrap().unwrap();
        assert!(toggled.purchased);
    }

    #[tokio::test]
    async fn test_gifts_newest_first() {
        let store = MemoryStore::new();
        let user = store.insert_user(&fingerprint("fp-1")).await.unwrap();
        let list = store
            .insert_list(
                user.id,
                &ListName::parse("Birthday").unwrap(),
                &ShareToken::generate(),
            )
            .await
            .unwrap();
        store.insert_gift(list.id, &new_gift("First")).await.unwrap();
        store.insert_gift(list.id, &new_gift("Second")).await.unwrap();

        let gifts = store.gifts_by_lists(&[list.id]).await.unwrap();
        let names: Vec<_> = gifts.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, ["Second", "First"]);
    }
}
