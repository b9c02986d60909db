//! Configuration management for Postsmith
//!
//! Settings for the generation endpoint, retry policy and content defaults.
//! Loaded from `.postsmith/config.toml` under a root directory, falling back to
//! defaults when the file does not exist.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::types::SlideCount;
use crate::{PostsmithError, Result};

/// Top-level Postsmith configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PostsmithConfig {
    /// Generation endpoint settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Backoff policy for rate-limited requests
    #[serde(default)]
    pub retry: RetryConfig,

    /// Content defaults
    #[serde(default)]
    pub content: ContentConfig,
}

/// Generation endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiConfig {
    /// Base URL, without the `/models/...` suffix
    #[serde(default = "default_endpoint_base")]
    pub endpoint_base: String,

    /// Model identifier used in the request path
    #[serde(default = "default_model")]
    pub model: String,

    /// Environment variable containing the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

/// Retry configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct RetryConfig {
    /// Retries after the first attempt when rate limited
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Delay before the first retry; doubled on each subsequent retry
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,
}

/// Content defaults
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContentConfig {
    /// Brand name woven into every prompt
    #[serde(default = "default_brand")]
    pub brand: String,

    /// Slide count used by the carousel job during fan-out
    #[serde(default = "default_carousel_slides")]
    pub carousel_slides: u8,

    /// WhatsApp number quoted in drafted replies
    #[serde(default = "default_whatsapp_contact")]
    pub whatsapp_contact: String,

    /// Mailbox quoted in drafted email replies
    #[serde(default = "default_gmail_contact")]
    pub gmail_contact: String,
}

// Default value providers
fn default_endpoint_base() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_model() -> String {
    "gemini-2.5-flash-preview-05-20".to_string()
}

fn default_api_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}

fn default_max_retries() -> u32 {
    5
}

fn default_initial_delay_ms() -> u64 {
    1000
}

fn default_brand() -> String {
    "Requires for Academic Services".to_string()
}

fn default_carousel_slides() -> u8 {
    3
}

fn default_whatsapp_contact() -> String {
    "01551053732".to_string()
}

fn default_gmail_contact() -> String {
    "requiresforeducationalservices@gmail.com".to_string()
}

impl PostsmithConfig {
    /// Load configuration from `.postsmith/config.toml` or use defaults
    pub fn load_or_default(root: &Path) -> Result<Self> {
        let config_path = root.join(".postsmith/config.toml");

        let config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str(&content).map_err(|e| {
                PostsmithError::Config(format!("Failed to parse config file: {}", e))
            })?
        } else {
            tracing::debug!("No config at {}, using defaults", config_path.display());
            Self::default()
        };

        config.validate()?;
        Ok(config)
    }

    /// Write default configuration to `.postsmith/config.toml`
    pub fn write_default(root: &Path) -> Result<()> {
        let config_dir = root.join(".postsmith");
        std::fs::create_dir_all(&config_dir)?;

        let config_path = config_dir.join("config.toml");
        let content = toml::to_string_pretty(&Self::default()).map_err(|e| {
            PostsmithError::Config(format!("Failed to serialize config: {}", e))
        })?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    /// Reject settings the engine cannot honor
    pub fn validate(&self) -> Result<()> {
        SlideCount::new(self.content.carousel_slides)?;

        if self.api.endpoint_base.trim().is_empty() {
            return Err(PostsmithError::Config("api.endpoint_base is empty".to_string()));
        }
        if self.api.model.trim().is_empty() {
            return Err(PostsmithError::Config("api.model is empty".to_string()));
        }
        Ok(())
    }

    /// Configured carousel slide count
    pub fn carousel_slides(&self) -> SlideCount {
        SlideCount::new(self.content.carousel_slides).unwrap_or_default()
    }
}

impl Default for PostsmithConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            retry: RetryConfig::default(),
            content: ContentConfig::default(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint_base: default_endpoint_base(),
            model: default_model(),
            api_key_env: default_api_key_env(),
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            initial_delay_ms: default_initial_delay_ms(),
        }
    }
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            brand: default_brand(),
            carousel_slides: default_carousel_slides(),
            whatsapp_contact: default_whatsapp_contact(),
            gmail_contact: default_gmail_contact(),
        }
    }
}
