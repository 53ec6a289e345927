//! Gift repository for `PostgreSQL`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use gift0_core::{GiftId, GiftName, GiftPrice, GiftUrl, ListId, Priority};

use super::{GiftStore, PgStore, RepositoryError};
use crate::models::{Gift, GiftUpdate, NewGift};

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct GiftRow {
    id: Uuid,
    list_id: Uuid,
    name: String,
    url: String,
    price: Option<String>,
    priority: Priority,
    purchased: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<GiftRow> for Gift {
    type Error = RepositoryError;

    fn try_from(row: GiftRow) -> Result<Self, Self::Error> {
        let corrupt = |field: &str, e: gift0_core::ValidationError| {
            RepositoryError::DataCorruption(format!("invalid gift {field} in database: {e}"))
        };

        let name = GiftName::parse(&row.name).map_err(|e| corrupt("name", e))?;
        let url = GiftUrl::parse(&row.url).map_err(|e| corrupt("url", e))?;
        let price = match row.price.as_deref() {
            Some(p) => GiftPrice::parse(p).map_err(|e| corrupt("price", e))?,
            None => None,
        };

        Ok(Self {
            id: GiftId::from_uuid(row.id),
            list_id: ListId::from_uuid(row.list_id),
            name,
            url,
            price,
            priority: row.priority,
            purchased: row.purchased,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const GIFT_COLUMNS: &str =
    "id, list_id, name, url, price, priority, purchased, created_at, updated_at";

// =============================================================================
// Repository
// =============================================================================

#[async_trait]
impl GiftStore for PgStore {
    async fn insert_gift(&self, list_id: ListId, gift: &NewGift) -> Result<Gift, RepositoryError> {
        let row = sqlx::query_as::<_, GiftRow>(&format!(
            r"
            INSERT INTO gifts (id, list_id, name, url, price, priority)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {GIFT_COLUMNS}
            "
        ))
        .bind(GiftId::generate().as_uuid())
        .bind(list_id.as_uuid())
        .bind(gift.name.as_str())
        .bind(gift.url.as_str())
        .bind(gift.price.as_ref().map(GiftPrice::as_str))
        .bind(gift.priority)
        .fetch_one(self.pool())
        .await?;

        row.try_into()
    }

    async fn find_gift(&self, id: GiftId) -> Result<Option<Gift>, RepositoryError> {
        let row = sqlx::query_as::<_, GiftRow>(&format!(
            "SELECT {GIFT_COLUMNS} FROM gifts WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(self.pool())
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn gifts_by_lists(&self, list_ids: &[ListId]) -> Result<Vec<Gift>, RepositoryError> {
        if list_ids.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = list_ids.iter().map(ListId::as_uuid).collect();
        let rows = sqlx::query_as::<_, GiftRow>(&format!(
            r"
            SELECT {GIFT_COLUMNS}
            FROM gifts
            WHERE list_id = ANY($1)
            ORDER BY created_at DESC
            "
        ))
        .bind(ids)
        .fetch_all(self.pool())
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn update_gift(&self, id: GiftId, update: &GiftUpdate) -> Result<Gift, RepositoryError> {
        // $4 says whether $5 should replace the price, so NULL can clear it
        let row = sqlx::query_as::<_, GiftRow>(&format!(
            r"
            UPDATE gifts
            SET name = COALESCE($2, name),
                url = COALESCE($3, url),
                price = CASE WHEN $4 THEN $5 ELSE price END,
                priority = COALESCE($6, priority),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {GIFT_COLUMNS}
            "
        ))
        .bind(id.as_uuid())
        .bind(update.name.as_ref().map(GiftName::as_str))
        .bind(update.url.as_ref().map(GiftUrl::as_str))
        .bind(update.price.is_some())
        .bind(update.price.as_ref().and_then(|p| p.as_ref().map(GiftPrice::as_str)))
        .bind(update.priority)
        .fetch_optional(self.pool())
        .await?
        .ok_or(RepositoryError::NotFound)?;

        row.try_into()
    }

    async fn toggle_purchased(
        &self,
        id: GiftId,
        list_id: ListId,
    ) -> Result<Option<Gift>, RepositoryError> {
        let row = sqlx::query_as::<_, GiftRow>(&format!(
            r"
            UPDATE gifts
            SET purchased = NOT purchased, updated_at = NOW()
            WHERE id = $1 AND list_id = $2
            RETURNING {GIFT_COLUMNS}
            "
        ))
        .bind(id.as_uuid())
        .bind(list_id.as_uuid())
        .fetch_optional(self.pool())
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn delete_gift(&self, id: GiftId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM gifts WHERE id = $1")
            .bind(id.as_uuid())
            .execute(self.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
