//! Gift list operations.

use tracing::instrument;

use gift0_core::{ListId, ListName, ShareToken, UserId};

use super::ServiceError;
use crate::db::{RepositoryError, Store};
use crate::models::{Gift, GiftList, ListWithGifts};

/// How many share tokens to try before giving up on a list insert.
const MAX_SHARE_TOKEN_ATTEMPTS: usize = 5;

/// A list as seen by a particular viewer.
#[derive(Debug, Clone)]
pub struct ViewedList {
    pub list: ListWithGifts,
    /// Whether the viewer owns the list.
    pub can_edit: bool,
}

/// List operations. Callers resolve the acting user first.
pub struct ListService<'a> {
    store: &'a dyn Store,
}

impl<'a> ListService<'a> {
    /// Create a new list service.
    #[must_use]
    pub const fn new(store: &'a dyn Store) -> Self {
        Self { store }
    }

    /// Create a list with a fresh share token.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Repository` if storage fails, including when
    /// every generated share token collided.
    #[instrument(skip(self))]
    pub async fn create(&self, owner_id: UserId, name: &ListName) -> Result<GiftList, ServiceError> {
        let mut attempt = 1;
        loop {
            let token = ShareToken::generate();
            match self.store.insert_list(owner_id, name, &token).await {
                Ok(list) => {
                    tracing::info!(list_id = %list.id, "list created");
                    return Ok(list);
                }
                Err(RepositoryError::Conflict(reason)) if attempt < MAX_SHARE_TOKEN_ATTEMPTS => {
                    tracing::warn!(attempt, %reason, "share token collision, regenerating");
                    attempt += 1;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// All lists of a user with their gifts, lists and gifts newest first.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Repository` if storage fails.
    #[instrument(skip(self))]
    pub async fn lists_for_owner(
        &self,
        owner_id: UserId,
    ) -> Result<Vec<ListWithGifts>, ServiceError> {
        let lists = self.store.lists_by_owner(owner_id).await?;
        let ids: Vec<ListId> = lists.iter().map(|l| l.id).collect();
        let gifts = self.store.gifts_by_lists(&ids).await?;

        Ok(group_gifts(lists, gifts))
    }

    /// Read a list by ID. `can_edit` is true only when `viewer` owns it.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::ListNotFound` if no list has this ID.
    #[instrument(skip(self))]
    pub async fn view(&self, id: ListId, viewer: Option<UserId>) -> Result<ViewedList, ServiceError> {
        let list = self
            .store
            .find_list(id)
            .await?
            .ok_or(ServiceError::ListNotFound)?;
        let can_edit = viewer.is_some_and(|v| list.is_owned_by(v));

        Ok(ViewedList {
            list: self.with_gifts(list).await?,
            can_edit,
        })
    }

    /// Read a list through its public share token.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::ListNotFound` if no list has this token.
    #[instrument(skip(self))]
    pub async fn shared(&self, token: &ShareToken) -> Result<ListWithGifts, ServiceError> {
        let list = self
            .store
            .find_list_by_share_token(token)
            .await?
            .ok_or(ServiceError::ListNotFound)?;

        self.with_gifts(list).await
    }

    /// Rename a list the acting user owns.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Unauthorized` if the list is missing or owned
    /// by someone else.
    #[instrument(skip(self))]
    pub async fn rename(
        &self,
        id: ListId,
        acting: UserId,
        name: &ListName,
    ) -> Result<GiftList, ServiceError> {
        self.owned(id, acting).await?;
        self.store
            .rename_list(id, name)
            .await
            .map_err(ServiceError::unauthorized_if_gone)
    }

    /// Delete a list the acting user owns, together with its gifts.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Unauthorized` if the list is missing or owned
    /// by someone else.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: ListId, acting: UserId) -> Result<(), ServiceError> {
        self.owned(id, acting).await?;
        self.store
            .delete_list(id)
            .await
            .map_err(ServiceError::unauthorized_if_gone)?;
        tracing::info!(list_id = %id, "list deleted");
        Ok(())
    }

    /// Load a list and check that `acting` owns it.
    ///
    /// A missing list and a foreign list are the same error.
    pub(crate) async fn owned(&self, id: ListId, acting: UserId) -> Result<GiftList, ServiceError> {
        match self.store.find_list(id).await? {
            Some(list) if list.is_owned_by(acting) => Ok(list),
            _ => Err(ServiceError::Unauthorized),
        }
    }

    async fn with_gifts(&self, list: GiftList) -> Result<ListWithGifts, ServiceError> {
        let gifts = self.store.gifts_by_lists(&[list.id]).await?;
        Ok(ListWithGifts { list, gifts })
    }
}

/// Attach gifts to their lists, keeping both orders.
fn group_gifts(lists: Vec<GiftList>, gifts: Vec<Gift>) -> Vec<ListWithGifts> {
    let mut grouped: Vec<ListWithGifts> = lists
        .into_iter()
        .map(|list| ListWithGifts {
            list,
            gifts: Vec::new(),
        })
        .collect();

    for gift in gifts {
        if let Some(entry) = grouped.iter_mut().find(|e| e.list.id == gift.list_id) {
            entry.gifts.push(gift);
        }
    }
    grouped
}
