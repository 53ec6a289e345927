//! Firecrawl page scraping.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::error::ExtractionError;

const FIRECRAWL_SCRAPE_URL: &str = "https://api.firecrawl.dev/v2/scrape";

/// Upper bound on one scrape, including JS rendering on Firecrawl's side.
const SCRAPE_TIMEOUT: Duration = Duration::from_secs(60);

/// Accept cached scrapes up to two days old.
const MAX_AGE_MS: u64 = 172_800_000;

/// Client for the Firecrawl scrape endpoint.
#[derive(Clone)]
pub struct FirecrawlClient {
    inner: Arc<FirecrawlClientInner>,
}

struct FirecrawlClientInner {
    client: reqwest::Client,
    endpoint: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ScrapeRequest<'a> {
    url: &'a str,
    only_main_content: bool,
    max_age: u64,
    parsers: [&'static str; 1],
    formats: [&'static str; 1],
}

impl<'a> ScrapeRequest<'a> {
    const fn new(url: &'a str) -> Self {
        Self {
            url,
            only_main_content: false,
            max_age: MAX_AGE_MS,
            parsers: ["pdf"],
            formats: ["markdown"],
        }
    }
}

#[derive(Debug, Deserialize)]
struct ScrapeResponse {
    data: Option<ScrapeData>,
}

#[derive(Debug, Deserialize)]
struct ScrapeData {
    markdown: Option<String>,
    content: Option<String>,
}

impl ScrapeResponse {
    /// Markdown if present and non-empty, else raw content.
    fn into_content(self) -> Option<String> {
        let data = self.data?;
        data.markdown
            .filter(|s| !s.trim().is_empty())
            .or_else(|| data.content.filter(|s| !s.trim().is_empty()))
    }
}

impl FirecrawlClient {
    /// Create a new client.
    ///
    /// # Errors
    ///
    /// Returns `ExtractionError::Config` if the API key is not a valid header
    /// value or the HTTP client cannot be built.
    pub fn new(api_key: &SecretString) -> Result<Self, ExtractionError> {
        Self::with_endpoint(api_key, FIRECRAWL_SCRAPE_URL, SCRAPE_TIMEOUT)
    }

    fn with_endpoint(
        api_key: &SecretString,
        endpoint: &str,
        timeout: Duration,
    ) -> Result<Self, ExtractionError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", api_key.expose_secret()))
                .map_err(|_| ExtractionError::Config("invalid Firecrawl API key".to_owned()))?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| ExtractionError::Config(e.to_string()))?;

        Ok(Self {
            inner: Arc::new(FirecrawlClientInner {
                client,
                endpoint: endpoint.to_owned(),
            }),
        })
    }

    /// Scrape a page and return its content as markdown.
    ///
    /// # Errors
    ///
    /// Returns `ExtractionError::Fetch` on transport errors or a non-success
    /// status, and `ExtractionError::EmptyContent` if the page has no content.
    #[instrument(skip(self))]
    pub async fn scrape(&self, url: &str) -> Result<String, ExtractionError> {
        let response = self
            .inner
            .client
            .post(&self.inner.endpoint)
            .json(&ScrapeRequest::new(url))
            .send()
            .await
            .map_err(|e| ExtractionError::Fetch(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExtractionError::Fetch(format!(
                "Firecrawl API error: {status}"
            )));
        }

        let body: ScrapeResponse = response
            .json()
            .await
            .map_err(|e| ExtractionError::Fetch(e.to_string()))?;

        body.into_content().ok_or(ExtractionError::EmptyContent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scrape_request_body() {
        let json = serde_json::to_value(ScrapeRequest::new("https://shop.example/p")).expect("serialize");
        assert_eq!(
            json,
            serde_json::json!({
                "url": "https://shop.example/p",
                "onlyMainContent": false,
                "maxAge": 172_800_000_u64,
                "parsers": ["pdf"],
                "formats": ["markdown"],
            })
        );
    }

    #[test]
    fn test_content_prefers_markdown() {
        let response: ScrapeResponse = serde_json::from_str(
            r##"{"data": {"markdown": "# Kettle", "content": "Kettle"}}"##,
        )
        .expect("deserialize");
        assert_eq!(response.into_content().as_deref(), Some("# Kettle"));
    }

    #[test]
    fn test_content_falls_back_to_raw_content() {
        let response: ScrapeResponse =
            serde_json::from_str(r#"{"data": {"markdown": "", "content": "Kettle"}}"#)
                .expect("deserialize");
        assert_eq!(response.into_content().as_deref(), Some("Kettle"));
    }

    #[tokio::test]
    async fn test_stalled_endpoint_times_out() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind");
        let endpoint = format!("http://{}/v2/scrape", listener.local_addr().expect("addr"));
        // Accept the connection and never answer.
        let server = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.expect("accept");
            tokio::time::sleep(Duration::from_secs(30)).await;
            drop(socket);
        });

        let client = FirecrawlClient::with_endpoint(
            &SecretString::from("fc-test-key"),
            &endpoint,
            Duration::from_millis(200),
        )
        .expect("client");

        let result = tokio::time::timeout(
            Duration::from_secs(10),
            client.scrape("https://shop.example/p"),
        )
        .await
        .expect("scrape should give up on its own");
        assert!(matches!(result, Err(ExtractionError::Fetch(_))));
        server.abort();
    }

    #[test]
    fn test_missing_content() {
        let response: ScrapeResponse =
            serde_json::from_str(r#"{"success": false}"#).expect("deserialize");
        assert!(response.into_content().is_none());
    }
}
