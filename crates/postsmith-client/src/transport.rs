//! HTTP transport abstraction
//!
//! The retry client talks to the network only through [`Transport`], so tests
//! can script status codes without a server.

use async_trait::async_trait;
use postsmith_core::{PostsmithError, Result};
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::time::Instant;

/// Raw HTTP response: status code and body text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// 200 response carrying a well-formed `generateContent` envelope
    pub fn ok_text(text: &str) -> Self {
        let body = serde_json::json!({
            "candidates": [ { "content": { "parts": [ { "text": text } ] } } ]
        });
        Self::new(200, body.to_string())
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Trait for sending JSON POST requests (allows mocking in tests)
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post_json(&self, url: &str, body: &serde_json::Value) -> Result<TransportResponse>;
}

/// Real transport backed by reqwest
#[derive(Clone, Default)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post_json(&self, url: &str, body: &serde_json::Value) -> Result<TransportResponse> {
        let response = self
            .client
            .post(url)
            .header("content-type", "application/json")
            .json(body)
            .send()
            .await
            // without_url keeps the key out of the message
            .map_err(|e| {
                PostsmithError::Transport(format!("Failed to send request: {}", e.without_url()))
            })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown".to_string());

        Ok(TransportResponse { status, body })
    }
}

/// A request observed by [`MockTransport`]
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub url: String,
    pub prompt: String,
    pub at: Instant,
}

type MockReply = std::result::Result<TransportResponse, String>;

/// Mock transport for testing
///
/// Resolution order per request: the queued sequence, then the first rule whose
/// needle appears in the prompt, then the default reply.
pub struct MockTransport {
    sequence: Mutex<VecDeque<MockReply>>,
    rules: Vec<(String, MockReply)>,
    default: MockReply,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            sequence: Mutex::new(VecDeque::new()),
            rules: Vec::new(),
            default: Ok(TransportResponse::ok_text("mock output")),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Reply used when nothing else matches
    pub fn with_default(mut self, response: TransportResponse) -> Self {
        self.default = Ok(response);
        self
    }

    /// Reply with `response` whenever the prompt contains `needle`
    pub fn with_rule(mut self, needle: &str, response: TransportResponse) -> Self {
        self.rules.push((needle.to_string(), Ok(response)));
        self
    }

    /// Fail at the transport level whenever the prompt contains `needle`
    pub fn with_transport_failure(mut self, needle: &str, message: &str) -> Self {
        self.rules.push((needle.to_string(), Err(message.to_string())));
        self
    }

    /// Replies consumed in order before rules and default apply
    pub fn with_sequence(self, responses: Vec<TransportResponse>) -> Self {
        {
            let mut sequence = lock(&self.sequence);
            sequence.extend(responses.into_iter().map(Ok));
        }
        self
    }

    /// Every request seen so far
    pub fn requests(&self) -> Vec<RecordedRequest> {
        lock(&self.requests).clone()
    }

    pub fn request_count(&self) -> usize {
        lock(&self.requests).len()
    }

    fn reply_for(&self, prompt: &str) -> MockReply {
        if let Some(reply) = lock(&self.sequence).pop_front() {
            return reply;
        }
        self.rules
            .iter()
            .find(|(needle, _)| prompt.contains(needle.as_str()))
            .map(|(_, reply)| reply.clone())
            .unwrap_or_else(|| self.default.clone())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[async_trait]
impl Transport for MockTransport {
    async fn post_json(&self, url: &str, body: &serde_json::Value) -> Result<TransportResponse> {
        let prompt = body
            .pointer("/contents/0/parts/0/text")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();

        let reply = self.reply_for(&prompt);
        lock(&self.requests).push(RecordedRequest {
            url: url.to_string(),
            prompt,
            at: Instant::now(),
        });

        reply.map_err(PostsmithError::Transport)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body(prompt: &str) -> serde_json::Value {
        json!({ "contents": [ { "role": "user", "parts": [ { "text": prompt } ] } ] })
    }

    #[tokio::test]
    async fn test_mock_resolution_order() {
        let mock = MockTransport::new()
            .with_rule("article", TransportResponse::new(500, "down"))
            .with_sequence(vec![TransportResponse::new(429, "slow down")]);

        let first = mock.post_json("u", &body("article please")).await.unwrap();
        assert_eq!(first.status, 429);

        let second = mock.post_json("u", &body("article please")).await.unwrap();
        assert_eq!(second.status, 500);

        let third = mock.post_json("u", &body("a post")).await.unwrap();
        assert!(third.is_success());

        let requests = mock.requests();
        assert_eq!(requests.len(), 3);
        assert_eq!(requests[2].prompt, "a post");
    }

    #[tokio::test]
    async fn test_mock_transport_failure() {
        let mock = MockTransport::new().with_transport_failure("boom", "connection reset");
        let result = mock.post_json("u", &body("boom")).await;
        assert!(matches!(result, Err(PostsmithError::Transport(_))));
        assert_eq!(mock.request_count(), 1);
    }
}
