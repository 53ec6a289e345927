//! Public share-link handlers.
//!
//! No fingerprint is needed here. Holders of a share token can read the list
//! and flip the purchased flag, nothing else.

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};

use gift0_core::{GiftId, ShareToken};

use super::ApiPath;
use super::views::{GiftView, ListView};
use crate::error::Result;
use crate::services::{GiftService, ListService, ServiceError};
use crate::state::AppState;

/// Build the share-link router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/shared/{token}", get(show))
        .route(
            "/api/shared/{token}/gifts/{gift_id}/toggle-purchased",
            post(toggle_purchased),
        )
}

/// A token that cannot have been issued matches no list.
fn share_token(raw: &str) -> std::result::Result<ShareToken, ServiceError> {
    ShareToken::parse(raw).map_err(|_| ServiceError::ListNotFound)
}

/// Read a shared list. The owner is not revealed.
///
/// # Errors
///
/// Returns 404 if no list has this token.
pub async fn show(
    State(state): State<AppState>,
    ApiPath(token): ApiPath<String>,
) -> Result<Json<ListView>> {
    let token = share_token(&token)?;
    let list = ListService::new(state.store()).shared(&token).await?;
    Ok(Json(ListView::shared(list, state.config())))
}

/// Flip the purchased flag on a gift of a shared list.
///
/// # Errors
///
/// Returns 404 if the token is unknown or the gift is not on that list.
pub async fn toggle_purchased(
    State(state): State<AppState>,
    ApiPath((token, gift_id)): ApiPath<(String, GiftId)>,
) -> Result<Json<GiftView>> {
    let token = share_token(&token)?;
    let gift = GiftService::new(state.store())
        .toggle_purchased_shared(gift_id, &token)
        .await?;
    Ok(Json(gift.into()))
}
