//! Request ID middleware for tracing and error correlation.
//!
//! An `x-request-id` from an upstream proxy is kept when it is a sane
//! header value; otherwise a UUID v4 is generated. The ID is tagged on the
//! Sentry scope, copied onto the request so the trace span picks it up, and
//! echoed on the response.

use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

/// The HTTP header name for request IDs.
pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Longest upstream request ID that is trusted.
const MAX_REQUEST_ID_LEN: usize = 128;

/// Pick the request ID for a request.
fn request_id_for(request: &Request) -> HeaderValue {
    request
        .headers()
        .get(&REQUEST_ID_HEADER)
        .filter(|v| !v.is_empty() && v.len() <= MAX_REQUEST_ID_LEN && v.to_str().is_ok())
        .cloned()
        .unwrap_or_else(|| {
            HeaderValue::from_str(&Uuid::new_v4().to_string())
                .unwrap_or_else(|_| HeaderValue::from_static("unknown"))
        })
}

/// Middleware that ensures every request and response carries a request ID.
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let request_id = request_id_for(&request);
    let id = request_id.to_str().unwrap_or_default().to_owned();

    sentry::configure_scope(|scope| {
        scope.set_tag("request_id", &id);
    });

    request
        .headers_mut()
        .insert(REQUEST_ID_HEADER, request_id.clone());

    let mut response = next.run(request).await;
    response.headers_mut().insert(REQUEST_ID_HEADER, request_id);
    response
}
