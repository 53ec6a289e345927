//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                                          - Liveness
//! GET    /health/ready                                    - Readiness (storage ping)
//!
//! # Lists (x-fingerprint-id required unless noted)
//! GET    /api/lists                                       - Caller's lists with gifts
//! POST   /api/lists                                       - Create list
//! GET    /api/lists/{id}                                  - One list (fingerprint optional)
//! PATCH  /api/lists/{id}                                  - Rename list
//! DELETE /api/lists/{id}                                  - Delete list and its gifts
//!
//! # Gifts
//! POST   /api/lists/{id}/gifts                            - Add gift by hand
//! PATCH  /api/gifts/{id}                                  - Partial update
//! POST   /api/gifts/{id}/toggle-purchased                 - Flip purchased
//! DELETE /api/gifts/{id}                                  - Delete gift
//!
//! # Intake (rate limited)
//! POST   /api/extract-gift                                - Extract without saving
//! POST   /api/intake                                      - Add one product URL
//! POST   /api/intake/batch                                - Add many product URLs
//!
//! # Sharing (no fingerprint)
//! GET    /api/shared/{token}                              - Read shared list
//! POST   /api/shared/{token}/gifts/{gift_id}/toggle-purchased - Flip purchased
//! ```

pub mod extract;
pub mod gifts;
pub mod health;
pub mod intake;
pub mod lists;
pub mod shared;
pub mod views;

use axum::{
    Router,
    body::Body,
    extract::{FromRequest, FromRequestParts},
    http::Request,
    middleware,
    routing::get,
};
use tower_http::trace::TraceLayer;

use gift0_core::Fingerprint;

use crate::error::{AppError, Result, set_sentry_user};
use crate::middleware::{REQUEST_ID_HEADER, intake_rate_limiter, request_id_middleware};
use crate::services::{IdentityService, ResolvedUser};
use crate::state::AppState;

/// JSON body extractor whose rejections use the API error format.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// Path extractor whose rejections use the API error format.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct ApiPath<T>(pub T);

/// Resolve the acting user and tag the Sentry scope with it.
pub(crate) async fn resolve_user(state: &AppState, fingerprint: &Fingerprint) -> Result<ResolvedUser> {
    let resolved = IdentityService::new(state.store()).resolve(fingerprint).await?;
    set_sentry_user(&resolved.user.id);
    Ok(resolved)
}

/// Create the JSON API routes.
pub fn api_routes() -> Router<AppState> {
    let paid = Router::new()
        .merge(extract::router())
        .merge(intake::router())
        .layer(intake_rate_limiter());

    Router::new()
        .merge(lists::router())
        .merge(gifts::router())
        .merge(shared::router())
        .merge(paid)
}

/// Build the application router with health checks, the API, request IDs,
/// and request tracing. Sentry layers are added by the binary.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .merge(api_routes())
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                let request_id = request
                    .headers()
                    .get(&REQUEST_ID_HEADER)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default();
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id,
                )
            }),
        )
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}
