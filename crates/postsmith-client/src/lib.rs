//! # postsmith-client
//!
//! Gemini `generateContent` client for Postsmith.
//!
//! - Single-turn prompts, no conversation history
//! - Exponential backoff on HTTP 429, fail-fast on everything else
//! - A [`Transport`] seam so the retry logic can be exercised without a network

mod auth;
mod client;
mod transport;
mod types;

pub use auth::{resolve_api_key, ApiKey};
pub use client::{Endpoint, GenerationClient, RetryPolicy};
pub use transport::{HttpTransport, MockTransport, RecordedRequest, Transport, TransportResponse};
pub use types::*;
