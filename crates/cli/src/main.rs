//! gift0 CLI - Database migrations and operational checks.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! gift0-cli migrate
//!
//! # Try the extraction pipeline on a product page without saving anything
//! gift0-cli extract https://shop.example/products/kettle
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `extract` - Scrape and structure one product URL, print the result as JSON

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "gift0-cli")]
#[command(author, version, about = "gift0 CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Extract gift details from a product URL
    Extract {
        /// Product page URL
        url: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Extract { url } => commands::extract::run(&url).await?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_extract_url() {
        let cli = Cli::try_parse_from(["gift0-cli", "extract", "https://shop.example/kettle"])
            .unwrap_or_else(|e| panic!("{e}"));
        assert!(matches!(
            cli.command,
            Commands::Extract { ref url } if url == "https://shop.example/kettle"
        ));
    }
}
