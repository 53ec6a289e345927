//! Gift handlers for list owners.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{patch, post},
};
use serde::{Deserialize, Deserializer};

use gift0_core::{GiftId, GiftName, GiftPrice, GiftUrl, ListId, Priority};

use super::views::GiftView;
use super::{ApiJson, ApiPath, resolve_user};
use crate::error::{AppError, Result};
use crate::middleware::RequireFingerprint;
use crate::models::{GiftUpdate, NewGift};
use crate::services::GiftService;
use crate::state::AppState;

/// Build the gift router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/lists/{id}/gifts", post(create))
        .route("/api/gifts/{id}", patch(update).delete(destroy))
        .route("/api/gifts/{id}/toggle-purchased", post(toggle_purchased))
}

/// Body for adding a gift by hand.
#[derive(Debug, Deserialize)]
pub struct AddGiftRequest {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub price: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
}

impl AddGiftRequest {
    /// Validate the fields. Without an explicit priority, a numeric price
    /// picks the band, and anything else is `medium`.
    fn into_new_gift(self) -> Result<NewGift> {
        let price = match self.price.as_deref() {
            Some(p) => GiftPrice::parse(p)?,
            None => None,
        };
        let priority = match self.priority.as_deref() {
            Some(p) => p.parse::<Priority>()?,
            None => price
                .as_ref()
                .and_then(GiftPrice::amount)
                .map_or_else(Priority::default, Priority::from_price),
        };

        Ok(NewGift {
            name: GiftName::parse(&self.name)?,
            url: GiftUrl::parse(&self.url)?,
            price,
            priority,
        })
    }
}

/// Body for a partial gift update. `"price": null` clears the price.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateGiftRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub price: Option<Option<String>>,
    #[serde(default)]
    pub priority: Option<String>,
}

/// Distinguish a field sent as `null` from one that was left out.
fn present<'de, D, T>(deserializer: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl UpdateGiftRequest {
    fn into_update(self) -> Result<GiftUpdate> {
        let price = match self.price {
            Some(Some(p)) => Some(GiftPrice::parse(&p)?),
            Some(None) => Some(None),
            None => None,
        };

        Ok(GiftUpdate {
            name: self.name.as_deref().map(GiftName::parse).transpose()?,
            url: self.url.as_deref().map(GiftUrl::parse).transpose()?,
            price,
            priority: self
                .priority
                .as_deref()
                .map(str::parse::<Priority>)
                .transpose()?,
        })
    }
}

/// Add a gift to a list the caller owns.
///
/// # Errors
///
/// Returns 400 for invalid fields and 401 if the caller does not own the list.
pub async fn create(
    State(state): State<AppState>,
    RequireFingerprint(fingerprint): RequireFingerprint,
    ApiPath(list_id): ApiPath<ListId>,
    ApiJson(body): ApiJson<AddGiftRequest>,
) -> Result<(StatusCode, Json<GiftView>)> {
    let gift = body.into_new_gift()?;
    let user = resolve_user(&state, &fingerprint).await?.user;
    let gift = GiftService::new(state.store())
        .add(list_id, user.id, &gift)
        .await?;

    Ok((StatusCode::CREATED, Json(gift.into())))
}

/// Update some fields of a gift the caller owns.
///
/// # Errors
///
/// Returns 400 for invalid or missing fields and 401 if the caller does not
/// own the gift's list.
pub async fn update(
    State(state): State<AppState>,
    RequireFingerprint(fingerprint): RequireFingerprint,
    ApiPath(id): ApiPath<GiftId>,
    ApiJson(body): ApiJson<UpdateGiftRequest>,
) -> Result<Json<GiftView>> {
    let update = body.into_update()?;
    if update.is_empty() {
        return Err(AppError::BadRequest("No fields to update".to_string()));
    }

    let user = resolve_user(&state, &fingerprint).await?.user;
    let gift = GiftService::new(state.store())
        .update(id, user.id, &update)
        .await?;
    Ok(Json(gift.into()))
}

/// Flip the purchased flag on a gift the caller owns.
///
/// # Errors
///
/// Returns 401 if the caller does not own the gift's list.
pub async fn toggle_purchased(
    State(state): State<AppState>,
    RequireFingerprint(fingerprint): RequireFingerprint,
    ApiPath(id): ApiPath<GiftId>,
) -> Result<Json<GiftView>> {
    let user = resolve_user(&state, &fingerprint).await?.user;
    let gift = GiftService::new(state.store())
        .toggle_purchased(id, user.id)
        .await?;
    Ok(Json(gift.into()))
}

/// Delete a gift the caller owns.
///
/// # Errors
///
/// Returns 401 if the caller does not own the gift's list.
pub async fn destroy(
    State(state): State<AppState>,
    RequireFingerprint(fingerprint): RequireFingerprint,
    ApiPath(id): ApiPath<GiftId>,
) -> Result<StatusCode> {
    let user = resolve_user(&state, &fingerprint).await?.user;
    GiftService::new(state.store()).delete(id, user.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
