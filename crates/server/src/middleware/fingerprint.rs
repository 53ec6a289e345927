//! Fingerprint extractors.
//!
//! Visitors are identified by a client-generated fingerprint sent in the
//! `x-fingerprint-id` header. There are no accounts or sessions.

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Response},
};

use gift0_core::Fingerprint;

use crate::error::AppError;

/// Header carrying the visitor fingerprint.
pub const FINGERPRINT_HEADER: &str = "x-fingerprint-id";

/// Extractor that requires a valid fingerprint header.
///
/// Missing or invalid headers are rejected with 400.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(RequireFingerprint(fingerprint): RequireFingerprint) -> impl IntoResponse {
///     fingerprint.to_string()
/// }
/// ```
pub struct RequireFingerprint(pub Fingerprint);

/// Rejection for [`RequireFingerprint`].
#[derive(Debug)]
pub enum FingerprintRejection {
    Missing,
    Invalid(String),
}

impl IntoResponse for FingerprintRejection {
    fn into_response(self) -> Response {
        let message = match self {
            Self::Missing => "Fingerprint ID is required".to_owned(),
            Self::Invalid(reason) => format!("Invalid fingerprint: {reason}"),
        };
        AppError::BadRequest(message).into_response()
    }
}

fn header_value(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(FINGERPRINT_HEADER)
        .and_then(|v| v.to_str().ok())
}

impl<S> FromRequestParts<S> for RequireFingerprint
where
    S: Send + Sync,
{
    type Rejection = FingerprintRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = header_value(parts).ok_or(FingerprintRejection::Missing)?;
        if raw.trim().is_empty() {
            return Err(FingerprintRejection::Missing);
        }

        Fingerprint::parse(raw)
            .map(Self)
            .map_err(|e| FingerprintRejection::Invalid(e.to_string()))
    }
}

/// Extractor that reads the fingerprint when one is present and valid.
///
/// Used by read endpoints that work for both owners and visitors.
pub struct OptionalFingerprint(pub Option<Fingerprint>);

impl<S> FromRequestParts<S> for OptionalFingerprint
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(
            header_value(parts).and_then(|raw| Fingerprint::parse(raw).ok()),
        ))
    }
}
