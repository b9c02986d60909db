//! Unified error types for Postsmith

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for all Postsmith operations
#[derive(Error, Debug)]
pub enum PostsmithError {
    // Generation API errors
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Rate limit exceeded after {retries} retries: {body}")]
    RateLimited { retries: u32, body: String },

    #[error("HTTP error! status: {status} - {body}")]
    Http { status: u16, body: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Unusable response: {0}")]
    Parse(String),

    // Caller errors
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl PostsmithError {
    /// Classify this error for reporting in a [`GenerationResult`](crate::GenerationResult)
    pub fn kind(&self) -> ErrorKind {
        match self {
            PostsmithError::Auth(_) => ErrorKind::Auth,
            PostsmithError::RateLimited { .. } => ErrorKind::RateLimit,
            PostsmithError::Http { .. } | PostsmithError::Transport(_) => ErrorKind::Http,
            PostsmithError::Parse(_) | PostsmithError::Serialization(_) => ErrorKind::Parse,
            PostsmithError::Validation(_) | PostsmithError::Config(_) => ErrorKind::Validation,
            PostsmithError::Io(_) => ErrorKind::Other,
        }
    }

    /// Whether the request client should back off and retry
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, PostsmithError::RateLimited { .. })
    }
}

/// Coarse failure classification carried by failed jobs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Auth,
    RateLimit,
    Http,
    Parse,
    Validation,
    Other,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ErrorKind::Auth => "auth",
            ErrorKind::RateLimit => "rate_limit",
            ErrorKind::Http => "http",
            ErrorKind::Parse => "parse",
            ErrorKind::Validation => "validation",
            ErrorKind::Other => "other",
        };
        f.write_str(name)
    }
}

/// Result type alias using PostsmithError
pub type Result<T> = std::result::Result<T, PostsmithError>;
