//! HTTP middleware and extractors.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. Rate limiting on intake and extraction routes (governor)

pub mod fingerprint;
pub mod rate_limit;
pub mod request_id;

pub use fingerprint::{FINGERPRINT_HEADER, OptionalFingerprint, RequireFingerprint};
pub use rate_limit::intake_rate_limiter;
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
