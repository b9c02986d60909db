//! # postsmith-core
//!
//! Core types for the Postsmith content generation engine.
//!
//! Postsmith turns a topic into a bundle of marketing content (platform posts,
//! a blog article, media prompts, carousel slides) by calling a generative-language
//! API once per artifact.
//!
//! ## Contents
//!
//! - [`ContentStore`]: everything generated for the selected topic
//! - [`PostsmithError`] and [`ErrorKind`]: failure taxonomy shared by every crate
//! - [`PostsmithConfig`]: endpoint, retry and content settings

mod config;
mod error;
mod types;

pub use config::{ApiConfig, ContentConfig, PostsmithConfig, RetryConfig};
pub use error::{ErrorKind, PostsmithError, Result};
pub use types::*;
