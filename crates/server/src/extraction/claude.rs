//! Anthropic Messages API client.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use tracing::instrument;

use super::error::{ApiErrorResponse, ClaudeError, ExtractionError};
use super::types::{ChatRequest, ChatResponse, Message, Tool, ToolChoice};

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const DEFAULT_MAX_TOKENS: u32 = 1024;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Client for the Anthropic Messages API.
#[derive(Clone)]
pub struct ClaudeClient {
    inner: Arc<ClaudeClientInner>,
}

struct ClaudeClientInner {
    client: reqwest::Client,
    model: String,
}

impl ClaudeClient {
    /// Create a new client.
    ///
    /// # Errors
    ///
    /// Returns `ExtractionError::Config` if the API key is not a valid header
    /// value or the HTTP client cannot be built.
    pub fn new(api_key: &SecretString, model: &str) -> Result<Self, ExtractionError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            "x-api-key",
            HeaderValue::from_str(api_key.expose_secret())
                .map_err(|_| ExtractionError::Config("invalid Anthropic API key".to_owned()))?,
        );
        headers.insert(
            "anthropic-version",
            HeaderValue::from_static(ANTHROPIC_VERSION),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ExtractionError::Config(e.to_string()))?;

        Ok(Self {
            inner: Arc::new(ClaudeClientInner {
                client,
                model: model.to_owned(),
            }),
        })
    }

    /// Ask the model for a single call to `tool`.
    ///
    /// The request forces the model to answer through the tool, so the
    /// returned input follows the tool's schema.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the API returns an error, or
    /// the response contains no call to `tool`.
    #[instrument(skip(self, system, prompt, tool), fields(model = %self.inner.model, tool = %tool.name))]
    pub async fn call_tool(
        &self,
        system: &str,
        prompt: String,
        tool: Tool,
        temperature: f32,
    ) -> Result<serde_json::Value, ClaudeError> {
        let tool_name = tool.name.clone();
        let request = ChatRequest {
            model: self.inner.model.clone(),
            max_tokens: DEFAULT_MAX_TOKENS,
            messages: vec![Message::user(prompt)],
            system: Some(system.to_owned()),
            temperature: Some(temperature),
            tools: Some(vec![tool]),
            tool_choice: Some(ToolChoice::Tool {
                name: tool_name.clone(),
            }),
        };

        let response = self
            .inner
            .client
            .post(ANTHROPIC_API_URL)
            .json(&request)
            .send()
            .await?;

        let chat = self.handle_response(response).await?;
        tracing::debug!(
            input_tokens = chat.usage.input_tokens,
            output_tokens = chat.usage.output_tokens,
            "model call complete"
        );

        chat.tool_input(&tool_name)
            .cloned()
            .ok_or_else(|| ClaudeError::Parse(format!("response has no {tool_name} call")))
    }

    /// Handle a response, parsing the body on success.
    async fn handle_response(
        &self,
        response: reqwest::Response,
    ) -> Result<ChatResponse, ClaudeError> {
        let status = response.status();

        if status.is_success() {
            let body = response.text().await?;
            serde_json::from_str(&body)
                .map_err(|e| ClaudeError::Parse(format!("Failed to parse response: {e}")))
        } else {
            Err(self.handle_error_status(status, response).await)
        }
    }

    /// Handle an error status code.
    async fn handle_error_status(
        &self,
        status: reqwest::StatusCode,
        response: reqwest::Response,
    ) -> ClaudeError {
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);
            return ClaudeError::RateLimited(retry_after);
        }

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return ClaudeError::Unauthorized("Invalid API key".to_string());
        }

        match response.text().await {
            Ok(body) => parse_api_error(&body),
            Err(e) => ClaudeError::Http(e),
        }
    }
}

/// Turn an error body into a `ClaudeError::Api`, keeping the raw body when
/// it is not the documented error shape.
fn parse_api_error(body: &str) -> ClaudeError {
    serde_json::from_str::<ApiErrorResponse>(body).map_or_else(
        |_| ClaudeError::Api {
            error_type: "unknown".to_string(),
            message: body.to_owned(),
        },
        |api_error| ClaudeError::Api {
            error_type: api_error.error.error_type,
            message: api_error.error.message,
        },
    )
}
