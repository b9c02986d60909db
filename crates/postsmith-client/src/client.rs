//! Resilient client for the Gemini `generateContent` endpoint
//!
//! Every call is a single-turn prompt. Rate-limited calls (HTTP 429) are retried
//! with pure exponential backoff; everything else fails fast.

use crate::auth::ApiKey;
use crate::transport::{HttpTransport, Transport, TransportResponse};
use crate::types::{first_candidate_text, GenerateContentRequest};
use postsmith_core::{ApiConfig, PostsmithConfig, PostsmithError, Result, RetryConfig};
use std::time::Duration;

const AUTH_FAILURE_HINT: &str = "Invalid API Key. Please check your Gemini API key.";

/// Backoff policy for rate-limited requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Delay before the first retry; doubled each time
    pub initial_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, initial_delay: Duration) -> Self {
        Self {
            max_retries,
            initial_delay,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(5, Duration::from_millis(1000))
    }
}

impl From<RetryConfig> for RetryPolicy {
    fn from(config: RetryConfig) -> Self {
        Self::new(config.max_retries, Duration::from_millis(config.initial_delay_ms))
    }
}

/// Location of the generation endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    base: String,
    model: String,
}

impl Endpoint {
    pub fn new(base: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            base: base.into().trim_end_matches('/').to_string(),
            model: model.into(),
        }
    }

    /// `{base}/models/{model}:generateContent?key={key}`
    pub fn url(&self, key: &ApiKey) -> String {
        format!("{}?key={}", self.redacted_url(), key.expose())
    }

    /// The URL without the key, safe to log
    pub fn redacted_url(&self) -> String {
        format!("{}/models/{}:generateContent", self.base, self.model)
    }
}

impl From<&ApiConfig> for Endpoint {
    fn from(config: &ApiConfig) -> Self {
        Self::new(&config.endpoint_base, &config.model)
    }
}

/// Client for generation requests
///
/// Holds no credential; the API key is supplied on every call.
pub struct GenerationClient<T: Transport> {
    transport: T,
    endpoint: Endpoint,
    retry: RetryPolicy,
}

impl GenerationClient<HttpTransport> {
    /// Create a client over real HTTP from configuration
    pub fn from_config(config: &PostsmithConfig) -> Self {
        Self::new(HttpTransport::new(), Endpoint::from(&config.api))
            .with_retry(RetryPolicy::from(config.retry))
    }
}

impl<T: Transport> GenerationClient<T> {
    pub fn new(transport: T, endpoint: Endpoint) -> Self {
        Self {
            transport,
            endpoint,
            retry: RetryPolicy::default(),
        }
    }

    /// Override the default retry policy
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Send a prompt and return the first candidate's text
    pub async fn generate_text(&self, api_key: &ApiKey, prompt: &str) -> Result<String> {
        let request = GenerateContentRequest::user_prompt(prompt);
        let body = self.invoke(api_key, &request).await?;
        first_candidate_text(&body)
    }

    /// Send a request with the client's retry policy, returning the parsed body
    pub async fn invoke(
        &self,
        api_key: &ApiKey,
        payload: &GenerateContentRequest,
    ) -> Result<serde_json::Value> {
        self.invoke_with(api_key, payload, self.retry).await
    }

    /// Send a request, retrying on HTTP 429 while budget remains
    ///
    /// With `max_retries = n` a persistently rate-limited call is attempted
    /// `n + 1` times, sleeping `d, 2d, ..., 2^(n-1)d` in between.
    pub async fn invoke_with(
        &self,
        api_key: &ApiKey,
        payload: &GenerateContentRequest,
        policy: RetryPolicy,
    ) -> Result<serde_json::Value> {
        let url = self.endpoint.url(api_key);
        let body = serde_json::to_value(payload)?;

        let mut retries = policy.max_retries;
        let mut delay = policy.initial_delay;
        let mut attempt = 1u32;

        loop {
            tracing::debug!(
                "POST {} (attempt {})",
                self.endpoint.redacted_url(),
                attempt
            );

            match self.send_once(&url, &body).await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_rate_limited() && retries > 0 => {
                    tracing::warn!(
                        "Rate limited (429). Retrying after {}ms... ({} retries left)",
                        delay.as_millis(),
                        retries
                    );
                    tokio::time::sleep(delay).await;
                    retries -= 1;
                    delay *= 2;
                    attempt += 1;
                }
                Err(PostsmithError::RateLimited { body, .. }) => {
                    return Err(PostsmithError::RateLimited {
                        retries: policy.max_retries,
                        body,
                    });
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn send_once(&self, url: &str, body: &serde_json::Value) -> Result<serde_json::Value> {
        let response = self.transport.post_json(url, body).await?;
        classify(response)
    }
}

/// Map a raw response to a parsed body or a classified error
fn classify(response: TransportResponse) -> Result<serde_json::Value> {
    match response.status {
        401 => Err(PostsmithError::Auth(AUTH_FAILURE_HINT.to_string())),
        429 => Err(PostsmithError::RateLimited {
            retries: 0,
            body: response.body,
        }),
        _ if !response.is_success() => Err(PostsmithError::Http {
            status: response.status,
            body: response.body,
        }),
        _ => serde_json::from_str(&response.body)
            .map_err(|e| PostsmithError::Parse(format!("Response body is not JSON: {}", e))),
    }
}
