//! Storage for users, gift lists, and gifts.
//!
//! # Tables
//!
//! - `users` - One row per fingerprint ever seen
//! - `gift_lists` - Named lists, each with a unique public share token
//! - `gifts` - Gift entries, cascade-deleted with their list
//!
//! Services talk to storage through the [`Store`] trait so the same workflow
//! runs against `PostgreSQL` ([`PgStore`]) and the in-memory store used by
//! tests ([`memory::MemoryStore`]).
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p gift0-cli -- migrate
//! ```

pub mod gifts;
pub mod lists;
pub mod memory;
pub mod users;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use gift0_core::{Fingerprint, GiftId, ListId, ListName, ShareToken, UserId};

use crate::models::{Gift, GiftList, GiftUpdate, NewGift, User};

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., duplicate fingerprint or share token).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Map a unique violation to [`RepositoryError::Conflict`].
pub(crate) fn conflict_on_unique(e: sqlx::Error, what: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict(format!("{what} already exists"));
    }
    RepositoryError::Database(e)
}

/// User records keyed by fingerprint.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Look up the user for a fingerprint.
    async fn find_user_by_fingerprint(
        &self,
        fingerprint: &Fingerprint,
    ) -> Result<Option<User>, RepositoryError>;

    /// Insert a user for a fingerprint.
    ///
    /// Returns `RepositoryError::Conflict` if the fingerprint already has a user.
    async fn insert_user(&self, fingerprint: &Fingerprint) -> Result<User, RepositoryError>;
}

/// Gift list records.
#[async_trait]
pub trait ListStore: Send + Sync {
    /// Insert a list.
    ///
    /// Returns `RepositoryError::Conflict` if the share token is taken.
    async fn insert_list(
        &self,
        owner_id: UserId,
        name: &ListName,
        share_token: &ShareToken,
    ) -> Result<GiftList, RepositoryError>;

    async fn find_list(&self, id: ListId) -> Result<Option<GiftList>, RepositoryError>;

    async fn find_list_by_share_token(
        &self,
        share_token: &ShareToken,
    ) -> Result<Option<GiftList>, RepositoryError>;

    /// All lists owned by a user, newest first.
    async fn lists_by_owner(&self, owner_id: UserId) -> Result<Vec<GiftList>, RepositoryError>;

    /// Rename a list and bump `updated_at`.
    ///
    /// Returns `RepositoryError::NotFound` if the list does not exist.
    async fn rename_list(&self, id: ListId, name: &ListName) -> Result<GiftList, RepositoryError>;

    /// Delete a list and, by cascade, its gifts.
    ///
    /// Returns `RepositoryError::NotFound` if the list does not exist.
    async fn delete_list(&self, id: ListId) -> Result<(), RepositoryError>;
}

/// Gift records.
#[async_trait]
pub trait GiftStore: Send + Sync {
    /// Insert a gift with `purchased = false`.
    async fn insert_gift(&self, list_id: ListId, gift: &NewGift) -> Result<Gift, RepositoryError>;

    async fn find_gift(&self, id: GiftId) -> Result<Option<Gift>, RepositoryError>;

    /// Gifts on any of the given lists, newest first.
    async fn gifts_by_lists(&self, list_ids: &[ListId]) -> Result<Vec<Gift>, RepositoryError>;

    /// Apply a partial update and bump `updated_at`.
    ///
    /// Returns `RepositoryError::NotFound` if the gift does not exist.
    async fn update_gift(&self, id: GiftId, update: &GiftUpdate) -> Result<Gift, RepositoryError>;

    /// Flip `purchased` on a gift, but only if it belongs to `list_id`.
    ///
    /// The check and the flip happen in one statement. Returns `Ok(None)`
    /// and changes nothing when the gift is not on that list.
    async fn toggle_purchased(
        &self,
        id: GiftId,
        list_id: ListId,
    ) -> Result<Option<Gift>, RepositoryError>;

    /// Delete a gift.
    ///
    /// Returns `RepositoryError::NotFound` if the gift does not exist.
    async fn delete_gift(&self, id: GiftId) -> Result<(), RepositoryError>;
}

/// Everything the services need from storage.
#[async_trait]
pub trait Store: UserStore + ListStore + GiftStore {
    /// Check that the backing storage is reachable.
    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}

/// `PostgreSQL`-backed [`Store`].
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Wrap a connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get a reference to the connection pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_error_display() {
        assert_eq!(RepositoryError::NotFound.to_string(), "not found");
        assert_eq!(
            RepositoryError::Conflict("share token already exists".to_owned()).to_string(),
            "constraint violation: share token already exists"
        );
    }

    #[test]
    fn test_conflict_on_unique_passes_other_errors_through() {
        let err = conflict_on_unique(sqlx::Error::RowNotFound, "fingerprint");
        assert!(matches!(
            err,
            RepositoryError::Database(sqlx::Error::RowNotFound)
        ));
    }

    #[test]
    fn test_store_is_object_safe() {
        fn assert_dyn(_: &dyn Store) {}
        let _ = assert_dyn;
    }
}
