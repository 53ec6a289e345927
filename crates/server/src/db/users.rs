//! User repository for `PostgreSQL`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use gift0_core::{Fingerprint, UserId};

use super::{PgStore, RepositoryError, UserStore, conflict_on_unique};
use crate::models::User;

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    fingerprint_id: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let fingerprint = Fingerprint::parse(&row.fingerprint_id).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid fingerprint in database: {e}"))
        })?;

        Ok(Self {
            id: UserId::from_uuid(row.id),
            fingerprint,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

// =============================================================================
// Repository
// =============================================================================

#[async_trait]
impl UserStore for PgStore {
    async fn find_user_by_fingerprint(
        &self,
        fingerprint: &Fingerprint,
    ) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            SELECT id, fingerprint_id, created_at, updated_at
            FROM users
            WHERE fingerprint_id = $1
            ",
        )
        .bind(fingerprint.as_str())
        .fetch_optional(self.pool())
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn insert_user(&self, fingerprint: &Fingerprint) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            INSERT INTO users (id, fingerprint_id)
            VALUES ($1, $2)
            RETURNING id, fingerprint_id, created_at, updated_at
            ",
        )
        .bind(UserId::generate().as_uuid())
        .bind(fingerprint.as_str())
        .fetch_one(self.pool())
        .await
        .map_err(|e| conflict_on_unique(e, "fingerprint"))?;

        row.try_into()
    }
}
