//! One-off extraction check.
//!
//! Runs the same scrape and structuring pipeline the server uses for intake
//! and prints the result. Nothing is written to the database.
//!
//! # Environment Variables
//!
//! - `FIRECRAWL_API_KEY` - Firecrawl API key
//! - `ANTHROPIC_API_KEY` - Anthropic API key
//! - `ANTHROPIC_MODEL` - Optional model override

use gift0_core::{GiftUrl, ValidationError};
use gift0_server::config::{ConfigError, ExtractionConfig};
use gift0_server::extraction::{ExtractionError, GiftExtractor, LlmGiftExtractor};
use thiserror::Error;

/// Errors that can occur during an extraction check.
#[derive(Debug, Error)]
pub enum ExtractCommandError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] ValidationError),

    #[error("{0}")]
    Extraction(#[from] ExtractionError),

    #[error("Failed to render result: {0}")]
    Render(#[from] serde_json::Error),
}

/// Extract one URL and print the gift as pretty JSON.
///
/// # Errors
///
/// Returns `ExtractCommandError` if configuration is missing, the URL is
/// malformed, or extraction fails.
pub async fn run(url: &str) -> Result<(), ExtractCommandError> {
    dotenvy::dotenv().ok();

    let url = GiftUrl::parse(url)?;
    let config = ExtractionConfig::from_env()?;
    let extractor = LlmGiftExtractor::new(&config)?;

    tracing::info!(%url, model = %config.model, "Extracting...");
    let gift = extractor.extract(&url).await?;

    #[allow(clippy::print_stdout)]
    {
        println!("{}", serde_json::to_string_pretty(&gift)?);
    }
    Ok(())
}
