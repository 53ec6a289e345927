//! Standalone extraction: describe a product URL without saving anything.

use axum::{Json, Router, extract::State, routing::post};
use serde::Deserialize;

use gift0_core::GiftUrl;

use super::ApiJson;
use crate::error::{AppError, Result};
use crate::extraction::ExtractedGift;
use crate::services::ServiceError;
use crate::state::AppState;

/// Build the extraction router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/extract-gift", post(extract_gift))
}

/// Body for extraction.
#[derive(Debug, Deserialize)]
pub struct ExtractRequest {
    #[serde(default)]
    pub url: Option<String>,
}

/// Pull the URL out of a request body, rejecting a missing or blank one.
pub(crate) fn required_url(url: Option<&str>) -> Result<&str> {
    url.filter(|u| !u.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("URL is required".to_string()))
}

/// Extract gift details from a product URL.
///
/// # Errors
///
/// Returns 400 for a missing or malformed URL and 500 with the failure
/// message if extraction fails.
pub async fn extract_gift(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<ExtractRequest>,
) -> Result<Json<ExtractedGift>> {
    let url = GiftUrl::parse(required_url(body.url.as_deref())?)?;
    let gift = state
        .extractor()
        .extract(&url)
        .await
        .map_err(ServiceError::from)?;
    Ok(Json(gift))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use super::*;

    #[test]
    fn test_required_url() {
        assert_eq!(
            required_url(Some("https://shop.example")).ok(),
            Some("https://shop.example")
        );
        for missing in [None, Some(""), Some("   ")] {
            let err = required_url(missing).err();
            assert!(matches!(
                err,
                Some(AppError::BadRequest(ref m)) if m == "URL is required"
            ));
        }
        assert_eq!(
            required_url(None).err().map(|e| e.status()),
            Some(StatusCode::BAD_REQUEST)
        );
    }
}
