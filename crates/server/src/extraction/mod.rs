//! URL extraction: turn a product page into a gift description.
//!
//! [`LlmGiftExtractor`] scrapes the page with Firecrawl and asks an Anthropic
//! model to fill in a `record_gift` tool call. The intake workflow only sees
//! the [`GiftExtractor`] trait, so tests drive it with scripted results.

pub mod claude;
pub mod error;
pub mod scrape;
pub mod types;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use gift0_core::{GiftName, GiftPrice, GiftUrl, ListName, Priority};

use crate::config::ExtractionConfig;
use crate::models::NewGift;

pub use claude::ClaudeClient;
pub use error::{ClaudeError, ExtractionError};
pub use scrape::FirecrawlClient;
use types::Tool;

const TOOL_NAME: &str = "record_gift";
const TEMPERATURE: f32 = 0.3;

const SYSTEM_PROMPT: &str = "\
You extract product information from web page content and suggest a gift list name.

Rules:
- Extract the product name accurately from the page content
- If a price is mentioned, give it in a form like \"$99.99\" or \"99.99\"
- Priority is \"high\" for expensive items ($200+), \"medium\" for mid-range ($50-200), \"low\" for affordable items (under $50)
- Suggest a concise, meaningful list name (2-4 words) that fits the product category
- List names should be shareable and clear, such as \"Birthday 2025\", \"Tech Wishlist\" or \"Holiday Gifts\"

Always answer by calling the record_gift tool.";

/// A gift description produced from a product URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedGift {
    /// Product name.
    pub name: GiftName,
    /// The URL that was extracted.
    pub url: GiftUrl,
    /// Display price, if the page shows one.
    pub price: Option<GiftPrice>,
    /// Priority band.
    pub priority: Priority,
    /// Suggested name for the list this gift belongs on.
    pub list_name: ListName,
}

impl ExtractedGift {
    /// Fields for inserting this gift.
    #[must_use]
    pub fn to_new_gift(&self) -> NewGift {
        NewGift {
            name: self.name.clone(),
            url: self.url.clone(),
            price: self.price.clone(),
            priority: self.priority,
        }
    }
}

/// Something that can describe the product behind a URL.
///
/// Calls are independent and may give different answers for the same URL.
#[async_trait]
pub trait GiftExtractor: Send + Sync {
    /// Extract a gift description from `url`.
    async fn extract(&self, url: &GiftUrl) -> Result<ExtractedGift, ExtractionError>;
}

/// Firecrawl + Anthropic extractor.
#[derive(Clone)]
pub struct LlmGiftExtractor {
    scraper: FirecrawlClient,
    claude: ClaudeClient,
    max_content_chars: usize,
}

impl LlmGiftExtractor {
    /// Build the extractor from configuration.
    ///
    /// # Errors
    ///
    /// Returns `ExtractionError::Config` if either HTTP client cannot be built.
    pub fn new(config: &ExtractionConfig) -> Result<Self, ExtractionError> {
        Ok(Self {
            scraper: FirecrawlClient::new(&config.firecrawl_api_key)?,
            claude: ClaudeClient::new(&config.anthropic_api_key, &config.model)?,
            max_content_chars: config.max_content_chars,
        })
    }
}

#[async_trait]
impl GiftExtractor for LlmGiftExtractor {
    #[instrument(skip(self), fields(url = %url))]
    async fn extract(&self, url: &GiftUrl) -> Result<ExtractedGift, ExtractionError> {
        let content = self.scraper.scrape(url.as_str()).await?;
        let content = truncate_chars(&content, self.max_content_chars);

        let prompt = format!(
            "Extract product information from this web page content:\n\nURL: {url}\n\nPage Content:\n{content}"
        );
        let input = self
            .claude
            .call_tool(SYSTEM_PROMPT, prompt, record_gift_tool(), TEMPERATURE)
            .await?;

        let gift = normalize(url, input)?;
        tracing::info!(name = %gift.name, priority = %gift.priority, "gift extracted");
        Ok(gift)
    }
}

/// The tool the model must call.
fn record_gift_tool() -> Tool {
    Tool {
        name: TOOL_NAME.to_owned(),
        description: "Record the product found on the page as a gift.".to_owned(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "name": {
                    "type": "string",
                    "description": "Product name extracted from the page"
                },
                "price": {
                    "type": "string",
                    "description": "Product price if available (format: $XX.XX or XX.XX)"
                },
                "priority": {
                    "type": "string",
                    "enum": ["high", "medium", "low"],
                    "description": "Priority level based on price and context"
                },
                "listName": {
                    "type": "string",
                    "description": "A short, descriptive name for the gift list (e.g., 'Birthday 2025', 'Tech Gifts')"
                }
            },
            "required": ["name", "priority", "listName"]
        }),
    }
}

/// Raw `record_gift` arguments as the model sends them.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecordGiftInput {
    name: String,
    #[serde(default)]
    price: Option<String>,
    #[serde(default)]
    priority: Option<String>,
    list_name: String,
}

/// Validate the model's answer and derive the priority from the price when
/// the price is numeric.
fn normalize(url: &GiftUrl, input: serde_json::Value) -> Result<ExtractedGift, ExtractionError> {
    let raw: RecordGiftInput = serde_json::from_value(input)
        .map_err(|e| ExtractionError::MalformedResponse(e.to_string()))?;

    let name = GiftName::parse(&raw.name)
        .map_err(|e| ExtractionError::MalformedResponse(e.to_string()))?;
    let list_name = ListName::parse(&raw.list_name)
        .map_err(|e| ExtractionError::MalformedResponse(e.to_string()))?;

    let price = raw.price.as_deref().and_then(|p| match GiftPrice::parse(p) {
        Ok(price) => price,
        Err(e) => {
            tracing::warn!(price = %p, error = %e, "dropping unusable price");
            None
        }
    });

    let priority = price
        .as_ref()
        .and_then(GiftPrice::amount)
        .map(Priority::from_price)
        .or_else(|| raw.priority.as_deref().and_then(|p| p.parse().ok()))
        .unwrap_or_default();

    Ok(ExtractedGift {
        name,
        url: url.clone(),
        price,
        priority,
        list_name,
    })
}

/// Keep at most `max` characters of `s`.
fn truncate_chars(s: &str, max: usize) -> &str {
    s.char_indices().nth(max).map_or(s, |(idx, _)| &s[..idx])
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn url() -> GiftUrl {
        GiftUrl::parse("https://shop.example/kettle").unwrap()
    }

    #[test]
    fn test_normalize_derives_priority_from_price() {
        let gift = normalize(
            &url(),
            serde_json::json!({
                "name": "Espresso Machine",
                "price": "$249.00",
                "priority": "low",
                "listName": "Kitchen Upgrades"
            }),
        )
        .unwrap();

        assert_eq!(gift.priority, Priority::High);
        assert_eq!(gift.price.unwrap().as_str(), "$249.00");
        assert_eq!(gift.list_name.as_str(), "Kitchen Upgrades");
        assert_eq!(gift.url, url());
    }

    #[test]
    fn test_normalize_keeps_model_priority_without_numeric_price() {
        let gift = normalize(
            &url(),
            serde_json::json!({
                "name": "Mystery Box",
                "price": "Contact seller",
                "priority": "high",
                "listName": "Surprises"
            }),
        )
        .unwrap();
        assert_eq!(gift.priority, Priority::High);

        let gift = normalize(
            &url(),
            serde_json::json!({"name": "Mug", "priority": "whatever", "listName": "Kitchen"}),
        )
        .unwrap();
        assert_eq!(gift.priority, Priority::Medium);
        assert!(gift.price.is_none());
    }

    #[test]
    fn test_normalize_rejects_blank_names() {
        let err = normalize(
            &url(),
            serde_json::json!({"name": " ", "priority": "low", "listName": "Kitchen"}),
        )
        .unwrap_err();
        assert!(matches!(err, ExtractionError::MalformedResponse(_)));

        let err = normalize(
            &url(),
            serde_json::json!({"name": "Mug", "priority": "low", "listName": ""}),
        )
        .unwrap_err();
        assert!(matches!(err, ExtractionError::MalformedResponse(_)));
    }

    #[test]
    fn test_normalize_rejects_missing_fields() {
        let err = normalize(&url(), serde_json::json!({"priority": "low"})).unwrap_err();
        assert!(matches!(err, ExtractionError::MalformedResponse(_)));
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("hello", 10), "hello");
        assert_eq!(truncate_chars("hello", 3), "hel");
        assert_eq!(truncate_chars("🎁🎁🎁", 2), "🎁🎁");
        assert_eq!(truncate_chars("abc", 0), "");
    }

    #[test]
    fn test_extracted_gift_serializes_camel_case() {
        let gift = normalize(
            &url(),
            serde_json::json!({"name": "Mug", "price": "$12", "priority": "low", "listName": "Kitchen"}),
        )
        .unwrap();
        let json = serde_json::to_value(&gift).unwrap();
        assert_eq!(json["listName"], "Kitchen");
        assert_eq!(json["price"], "$12");
        assert_eq!(json["priority"], "low");
        assert_eq!(json["url"], "https://shop.example/kettle");
    }

    #[test]
    fn test_record_gift_tool_requires_list_name() {
        let tool = record_gift_tool();
        assert_eq!(tool.name, TOOL_NAME);
        let required = tool.input_schema["required"].as_array().unwrap();
        assert!(required.iter().any(|v| v == "listName"));
        assert!(!required.iter().any(|v| v == "price"));
    }
}
