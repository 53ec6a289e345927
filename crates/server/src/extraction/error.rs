//! Error types for URL extraction.

use thiserror::Error;

/// Errors that can occur when talking to the Anthropic API.
#[derive(Debug, Error)]
pub enum ClaudeError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API returned an error.
    #[error("API error ({error_type}): {message}")]
    Api {
        /// Error type from the API.
        error_type: String,
        /// Error message.
        message: String,
    },

    /// Rate limited by the API.
    #[error("rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Authentication failed.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Failed to parse response.
    #[error("parse error: {0}")]
    Parse(String),
}

/// API error response body.
#[derive(Debug, serde::Deserialize)]
pub struct ApiErrorResponse {
    /// Error type.
    #[serde(rename = "type")]
    pub error_type: String,
    /// Nested error details.
    pub error: ApiError,
}

/// Nested error details.
#[derive(Debug, serde::Deserialize)]
pub struct ApiError {
    /// Error type.
    #[serde(rename = "type")]
    pub error_type: String,
    /// Error message.
    pub message: String,
}

/// Errors from turning a product URL into a gift description.
///
/// The `Display` output is shown to clients as-is.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// The page could not be scraped.
    #[error("Failed to fetch URL content: {0}")]
    Fetch(String),

    /// The scraper returned no usable content.
    #[error("Failed to fetch URL content: No content found")]
    EmptyContent,

    /// The model call failed.
    #[error("Failed to extract gift information: {0}")]
    Model(#[from] ClaudeError),

    /// The model answered, but not with a usable gift.
    #[error("Failed to extract gift information: {0}")]
    MalformedResponse(String),

    /// An HTTP client could not be built from configuration.
    #[error("extraction is misconfigured: {0}")]
    Config(String),
}
