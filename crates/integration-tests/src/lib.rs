//! Integration test harness for gift0.
//!
//! Tests drive the real axum router with `tower::ServiceExt::oneshot`,
//! backed by the in-memory store and a scripted extractor, so no database
//! or network access is needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p gift0-integration-tests
//! ```

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use secrecy::SecretString;
use serde_json::Value;
use tower::ServiceExt;

use gift0_core::{GiftName, GiftPrice, GiftUrl, ListName, Priority};
use gift0_server::config::{DEFAULT_MAX_CONTENT_CHARS, DEFAULT_MODEL, ExtractionConfig};
use gift0_server::db::memory::MemoryStore;
use gift0_server::extraction::{ExtractedGift, ExtractionError, GiftExtractor};
use gift0_server::middleware::FINGERPRINT_HEADER;
use gift0_server::{AppState, ServerConfig};

/// Public base URL used in test configuration.
pub const BASE_URL: &str = "https://gift0.test";

/// What the scripted extractor answers for one URL.
#[derive(Clone)]
enum Page {
    Product {
        name: String,
        price: Option<String>,
        list_name: String,
    },
    Broken(String),
}

/// A [`GiftExtractor`] with canned answers per URL.
///
/// Unknown URLs fail the way a page with no content does.
#[derive(Default)]
pub struct ScriptedExtractor {
    pages: HashMap<String, Page>,
    calls: AtomicUsize,
}

impl ScriptedExtractor {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `url` with a product.
    #[must_use]
    pub fn product(mut self, url: &str, name: &str, price: Option<&str>, list_name: &str) -> Self {
        self.pages.insert(
            url.to_owned(),
            Page::Product {
                name: name.to_owned(),
                price: price.map(str::to_owned),
                list_name: list_name.to_owned(),
            },
        );
        self
    }

    /// Fail `url` with a fetch error carrying `reason`.
    #[must_use]
    pub fn broken(mut self, url: &str, reason: &str) -> Self {
        self.pages
            .insert(url.to_owned(), Page::Broken(reason.to_owned()));
        self
    }

    /// Number of extractions performed.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GiftExtractor for ScriptedExtractor {
    async fn extract(&self, url: &GiftUrl) -> Result<ExtractedGift, ExtractionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.pages.get(url.as_str()) {
            Some(Page::Product {
                name,
                price,
                list_name,
            }) => {
                let price = price
                    .as_deref()
                    .and_then(|p| GiftPrice::parse(p).ok().flatten());
                let priority = price
                    .as_ref()
                    .and_then(GiftPrice::amount)
                    .map_or_else(Priority::default, Priority::from_price);
                Ok(ExtractedGift {
                    name: GiftName::parse(name).unwrap(),
                    url: url.clone(),
                    price,
                    priority,
                    list_name: ListName::parse(list_name).unwrap(),
                })
            }
            Some(Page::Broken(reason)) => Err(ExtractionError::Fetch(reason.clone())),
            None => Err(ExtractionError::EmptyContent),
        }
    }
}

/// Configuration that never touches the environment.
#[must_use]
pub fn test_config() -> ServerConfig {
    ServerConfig {
        database_url: SecretString::from("postgres://localhost/gift0_test"),
        host: "127.0.0.1".parse().unwrap(),
        port: 0,
        base_url: BASE_URL.to_owned(),
        extraction: ExtractionConfig {
            firecrawl_api_key: SecretString::from("fc-test"),
            anthropic_api_key: SecretString::from("sk-ant-test"),
            model: DEFAULT_MODEL.to_owned(),
            max_content_chars: DEFAULT_MAX_CONTENT_CHARS,
        },
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 0.0,
        sentry_traces_sample_rate: 0.0,
    }
}

/// A response reduced to what tests look at.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    /// Parsed JSON body, or `Value::Null` for an empty body.
    pub body: Value,
}

impl TestResponse {
    /// The `error` message of an error body.
    #[must_use]
    pub fn error(&self) -> &str {
        self.body["error"].as_str().unwrap_or_default()
    }
}

/// The router wired to in-memory storage and a scripted extractor.
pub struct TestApp {
    router: Router,
    pub store: Arc<MemoryStore>,
    pub extractor: Arc<ScriptedExtractor>,
}

impl TestApp {
    /// App whose extractor knows no pages.
    #[must_use]
    pub fn new() -> Self {
        Self::with_extractor(ScriptedExtractor::new())
    }

    #[must_use]
    pub fn with_extractor(extractor: ScriptedExtractor) -> Self {
        let store = Arc::new(MemoryStore::new());
        let extractor = Arc::new(extractor);
        let state = AppState::new(test_config(), store.clone(), extractor.clone());
        Self {
            router: gift0_server::app(state),
            store,
            extractor,
        }
    }

    /// Send one request, acting as `fingerprint` when given.
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        fingerprint: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(fp) = fingerprint {
            builder = builder.header(FINGERPRINT_HEADER, fp);
        }
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str, fingerprint: Option<&str>) -> TestResponse {
        self.send(Method::GET, uri, fingerprint, None).await
    }

    pub async fn post(&self, uri: &str, fingerprint: Option<&str>, body: Value) -> TestResponse {
        self.send(Method::POST, uri, fingerprint, Some(body)).await
    }

    pub async fn patch(&self, uri: &str, fingerprint: Option<&str>, body: Value) -> TestResponse {
        self.send(Method::PATCH, uri, fingerprint, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, fingerprint: Option<&str>) -> TestResponse {
        self.send(Method::DELETE, uri, fingerprint, None).await
    }

    /// Create a list as `fingerprint` and return its JSON.
    pub async fn create_list(&self, fingerprint: &str, name: &str) -> Value {
        let response = self
            .post(
                "/api/lists",
                Some(fingerprint),
                serde_json::json!({ "name": name }),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        response.body
    }

    /// Add a gift by hand as `fingerprint` and return its JSON.
    pub async fn add_gift(&self, fingerprint: &str, list_id: &str, name: &str) -> Value {
        let response = self
            .post(
                &format!("/api/lists/{list_id}/gifts"),
                Some(fingerprint),
                serde_json::json!({ "name": name, "url": "https://shop.example/item" }),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        response.body
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

/// String field of a JSON object.
#[must_use]
pub fn str_field<'a>(value: &'a Value, key: &str) -> &'a str {
    value[key].as_str().unwrap()
}
