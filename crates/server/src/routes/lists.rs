//! Gift list handlers.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::get,
};
use serde::{Deserialize, Serialize};

use gift0_core::{ListId, ListName};

use super::views::ListView;
use super::{ApiJson, ApiPath, resolve_user};
use crate::error::Result;
use crate::middleware::{OptionalFingerprint, RequireFingerprint};
use crate::services::{IdentityService, ListService};
use crate::state::AppState;

/// Build the list router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/lists", get(index).post(create))
        .route("/api/lists/{id}", get(show).patch(rename).delete(destroy))
}

/// The caller's lists.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListsResponse {
    pub lists: Vec<ListView>,
    /// True when this request was the first time the fingerprint was seen.
    pub is_new_user: bool,
}

/// Body for creating or renaming a list.
#[derive(Debug, Deserialize)]
pub struct ListNameRequest {
    pub name: String,
}

/// List the caller's lists, newest first, each with its gifts.
///
/// # Errors
///
/// Returns 400 without a fingerprint, 500 if storage fails.
pub async fn index(
    State(state): State<AppState>,
    RequireFingerprint(fingerprint): RequireFingerprint,
) -> Result<Json<ListsResponse>> {
    let resolved = resolve_user(&state, &fingerprint).await?;
    let lists = ListService::new(state.store())
        .lists_for_owner(resolved.user.id)
        .await?;

    Ok(Json(ListsResponse {
        lists: lists
            .into_iter()
            .map(|l| ListView::owned(l, state.config()))
            .collect(),
        is_new_user: resolved.is_new,
    }))
}

/// Create an empty list.
///
/// # Errors
///
/// Returns 400 for a blank or oversized name.
pub async fn create(
    State(state): State<AppState>,
    RequireFingerprint(fingerprint): RequireFingerprint,
    ApiJson(body): ApiJson<ListNameRequest>,
) -> Result<(StatusCode, Json<ListView>)> {
    let name = ListName::parse(&body.name)?;
    let user = resolve_user(&state, &fingerprint).await?.user;
    let list = ListService::new(state.store()).create(user.id, &name).await?;

    Ok((
        StatusCode::CREATED,
        Json(ListView::created(list, state.config())),
    ))
}

/// Read one list. `canEdit` tells the caller whether they own it.
///
/// Reading never registers the fingerprint.
///
/// # Errors
///
/// Returns 404 if the list does not exist.
pub async fn show(
    State(state): State<AppState>,
    OptionalFingerprint(fingerprint): OptionalFingerprint,
    ApiPath(id): ApiPath<ListId>,
) -> Result<Json<ListView>> {
    let viewer = match fingerprint {
        Some(fp) => IdentityService::new(state.store())
            .lookup(&fp)
            .await?
            .map(|u| u.id),
        None => None,
    };

    let viewed = ListService::new(state.store()).view(id, viewer).await?;
    Ok(Json(
        ListView::owned(viewed.list, state.config()).with_can_edit(viewed.can_edit),
    ))
}

/// Rename a list the caller owns.
///
/// # Errors
///
/// Returns 400 for an invalid name and 401 if the caller does not own the list.
pub async fn rename(
    State(state): State<AppState>,
    RequireFingerprint(fingerprint): RequireFingerprint,
    ApiPath(id): ApiPath<ListId>,
    ApiJson(body): ApiJson<ListNameRequest>,
) -> Result<Json<ListView>> {
    let name = ListName::parse(&body.name)?;
    let user = resolve_user(&state, &fingerprint).await?.user;
    let lists = ListService::new(state.store());
    lists.rename(id, user.id, &name).await?;

    let viewed = lists.view(id, Some(user.id)).await?;
    Ok(Json(
        ListView::owned(viewed.list, state.config()).with_can_edit(viewed.can_edit),
    ))
}

/// Delete a list the caller owns, with its gifts.
///
/// # Errors
///
/// Returns 401 if the caller does not own the list.
pub async fn destroy(
    State(state): State<AppState>,
    RequireFingerprint(fingerprint): RequireFingerprint,
    ApiPath(id): ApiPath<ListId>,
) -> Result<StatusCode> {
    let user = resolve_user(&state, &fingerprint).await?.user;
    ListService::new(state.store()).delete(id, user.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
