//! Credential handling for the generation API
//!
//! The key is supplied by the caller, either explicitly or through an
//! environment variable named in configuration.

use postsmith_core::{PostsmithError, Result};
use std::env;

/// Caller-supplied API key
///
/// `Debug` never prints the key itself.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Wrap a key, rejecting blank input
    pub fn new(key: impl Into<String>) -> Result<Self> {
        let key = key.into().trim().to_string();
        if key.is_empty() {
            return Err(PostsmithError::Auth(
                "API key is empty. Please enter your Gemini API key.".to_string(),
            ));
        }
        Ok(Self(key))
    }

    /// The raw key, for building request URLs only
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ApiKey(<redacted>)")
    }
}

/// Resolve the API key
///
/// Priority:
/// 1. Explicit key (e.g. a `--api-key` flag)
/// 2. The environment variable named by `env_var`
pub fn resolve_api_key(explicit: Option<&str>, env_var: &str) -> Result<ApiKey> {
    if let Some(key) = explicit {
        tracing::info!("Using API key supplied on the command line");
        return ApiKey::new(key);
    }

    if let Ok(key) = env::var(env_var) {
        tracing::info!("Using API key from {}", env_var);
        return ApiKey::new(key);
    }

    Err(PostsmithError::Auth(format!(
        "No API key found. Pass --api-key or set {}=...",
        env_var
    )))
}
