//! Gift list repository for `PostgreSQL`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use gift0_core::{ListId, ListName, ShareToken, UserId};

use super::{ListStore, PgStore, RepositoryError, conflict_on_unique};
use crate::models::GiftList;

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct GiftListRow {
    id: Uuid,
    name: String,
    owner_id: Uuid,
    share_token: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<GiftListRow> for GiftList {
    type Error = RepositoryError;

    fn try_from(row: GiftListRow) -> Result<Self, Self::Error> {
        let name = ListName::parse(&row.name).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid list name in database: {e}"))
        })?;
        let share_token = ShareToken::parse(&row.share_token).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid share token in database: {e}"))
        })?;

        Ok(Self {
            id: ListId::from_uuid(row.id),
            name,
            owner_id: UserId::from_uuid(row.owner_id),
            share_token,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const LIST_COLUMNS: &str = "id, name, owner_id, share_token, created_at, updated_at";

// =============================================================================
// Repository
// =============================================================================

#[async_trait]
impl ListStore for PgStore {
    async fn insert_list(
        &self,
        owner_id: UserId,
        name: &ListName,
        share_token: &ShareToken,
    ) -> Result<GiftList, RepositoryError> {
        let row = sqlx::query_as::<_, GiftListRow>(&format!(
            r"
            INSERT INTO gift_lists (id, name, owner_id, share_token)
            VALUES ($1, $2, $3, $4)
            RETURNING {LIST_COLUMNS}
            "
        ))
        .bind(ListId::generate().as_uuid())
        .bind(name.as_str())
        .bind(owner_id.as_uuid())
        .bind(share_token.as_str())
        .fetch_one(self.pool())
        .await
        .map_err(|e| conflict_on_unique(e, "share token"))?;

        row.try_into()
    }

    async fn find_list(&self, id: ListId) -> Result<Option<GiftList>, RepositoryError> {
        let row = sqlx::query_as::<_, GiftListRow>(&format!(
            "SELECT {LIST_COLUMNS} FROM gift_lists WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(self.pool())
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn find_list_by_share_token(
        &self,
        share_token: &ShareToken,
    ) -> Result<Option<GiftList>, RepositoryError> {
        let row = sqlx::query_as::<_, GiftListRow>(&format!(
            "SELECT {LIST_COLUMNS} FROM gift_lists WHERE share_token = $1"
        ))
        .bind(share_token.as_str())
        .fetch_optional(self.pool())
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn lists_by_owner(&self, owner_id: UserId) -> Result<Vec<GiftList>, RepositoryError> {
        let rows = sqlx::query_as::<_, GiftListRow>(&format!(
            r"
            SELECT {LIST_COLUMNS}
            FROM gift_lists
            WHERE owner_id = $1
            ORDER BY created_at DESC
            "
        ))
        .bind(owner_id.as_uuid())
        .fetch_all(self.pool())
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn rename_list(&self, id: ListId, name: &ListName) -> Result<GiftList, RepositoryError> {
        let row = sqlx::query_as::<_, GiftListRow>(&format!(
            r"
            UPDATE gift_lists
            SET name = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {LIST_COLUMNS}
            "
        ))
        .bind(id.as_uuid())
        .bind(name.as_str())
        .fetch_optional(self.pool())
        .await?
        .ok_or(RepositoryError::NotFound)?;

        row.try_into()
    }

    async fn delete_list(&self, id: ListId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM gift_lists WHERE id = $1")
            .bind(id.as_uuid())
            .execute(self.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
