//! URL intake handlers: turn product links into gifts on the caller's lists.

use axum::{Json, Router, extract::State, routing::post};
use serde::{Deserialize, Serialize};

use gift0_core::ListId;

use super::extract::required_url;
use super::views::GiftView;
use super::ApiJson;
use crate::error::{AppError, Result};
use crate::middleware::RequireFingerprint;
use crate::services::{BatchItem, IntakeOptions, IntakeService};
use crate::state::AppState;

/// Build the intake router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/intake", post(intake))
        .route("/api/intake/batch", post(intake_batch))
}

/// Body for single-URL intake.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntakeRequest {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub list_id: Option<ListId>,
    #[serde(default)]
    pub force_new_list: bool,
}

/// Body for batch intake.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchIntakeRequest {
    #[serde(default)]
    pub urls: Vec<String>,
    #[serde(default)]
    pub list_id: Option<ListId>,
    #[serde(default)]
    pub force_new_list: bool,
}

/// Result of single-URL intake.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntakeResponse {
    pub list_id: ListId,
    pub gift: GiftView,
    pub is_new_list: bool,
}

/// One URL's outcome in a batch.
#[derive(Debug, Serialize)]
pub struct BatchItemResponse {
    pub success: bool,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gift: Option<GiftView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<BatchItem> for BatchItemResponse {
    fn from(item: BatchItem) -> Self {
        match item.result {
            Ok(gift) => Self {
                success: true,
                url: item.url,
                gift: Some(gift.into()),
                error: None,
            },
            Err(e) => Self {
                success: false,
                url: item.url,
                gift: None,
                error: Some(AppError::from(e).public_message()),
            },
        }
    }
}

/// Result of batch intake, in input order.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchIntakeResponse {
    pub list_id: ListId,
    pub list_name: String,
    pub results: Vec<BatchItemResponse>,
    pub is_new_list: bool,
}

/// Add the product at one URL to the caller's lists.
///
/// # Errors
///
/// Returns 400 for a missing or malformed URL, 401 if an explicit list is
/// not the caller's, and 500 with the failure message if extraction fails.
pub async fn intake(
    State(state): State<AppState>,
    RequireFingerprint(fingerprint): RequireFingerprint,
    ApiJson(body): ApiJson<IntakeRequest>,
) -> Result<Json<IntakeResponse>> {
    let url = required_url(body.url.as_deref())?;
    let options = IntakeOptions {
        list_id: body.list_id,
        force_new_list: body.force_new_list,
    };

    let outcome = IntakeService::new(state.store(), state.extractor())
        .intake(&fingerprint, url, options)
        .await?;

    Ok(Json(IntakeResponse {
        list_id: outcome.list_id,
        gift: outcome.gift.into(),
        is_new_list: outcome.is_new_list,
    }))
}

/// Add the products at several URLs to one list.
///
/// Per-URL failures are reported in `results`; the request itself only
/// fails when nothing could be written.
///
/// # Errors
///
/// Returns 400 for no URLs or any malformed URL, and 500 if the first URL
/// cannot be extracted while choosing the list.
pub async fn intake_batch(
    State(state): State<AppState>,
    RequireFingerprint(fingerprint): RequireFingerprint,
    ApiJson(body): ApiJson<BatchIntakeRequest>,
) -> Result<Json<BatchIntakeResponse>> {
    let options = IntakeOptions {
        list_id: body.list_id,
        force_new_list: body.force_new_list,
    };

    let outcome = IntakeService::new(state.store(), state.extractor())
        .intake_batch(&fingerprint, &body.urls, options)
        .await?;

    let succeeded = outcome.results.iter().filter(|r| r.is_success()).count();
    tracing::info!(
        list_id = %outcome.list_id,
        total = outcome.results.len(),
        succeeded,
        "batch intake finished"
    );

    Ok(Json(BatchIntakeResponse {
        list_id: outcome.list_id,
        list_name: outcome.list_name,
        results: outcome.results.into_iter().map(Into::into).collect(),
        is_new_list: outcome.is_new_list,
    }))
}
