//! Generative model access
//!
//! A request goes to the primary provider first and, on any failure, once to
//! the secondary provider. There is no other retry, no backoff and no caching.
//! Every response is normalized (fences stripped, JSON parsed) and checked for
//! the call site's required key before it is handed back.

pub mod client;
pub mod provider;
pub mod response;
#[cfg(test)]
pub(crate) mod testing;

pub use client::AiClient;
pub use provider::GenerativeModelProvider;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Model call errors
#[derive(Debug, Error)]
pub enum AiError {
    /// No API key configured for the provider
    #[error("model API key not configured")]
    NotConfigured,

    #[error("network error: {0}")]
    Network(String),

    #[error("model API error {0}: {1}")]
    Api(u16, String),

    #[error("model returned no text")]
    EmptyResponse,

    #[error("unparseable model output: {0}")]
    Parse(String),

    #[error("model output missing required key `{0}`")]
    MissingKey(String),

    #[error("model output does not match schema: {0}")]
    Schema(String),

    /// Both providers failed; terminal for the request
    #[error("all model providers failed (primary: {primary}; fallback: {fallback})")]
    ModelUnavailable { primary: String, fallback: String },
}

/// Image sent alongside a prompt
#[derive(Debug, Clone)]
pub struct InlineImage {
    pub mime_type: String,
    /// Standard base64 without a `data:` prefix
    pub data_base64: String,
}

/// Prompt plus optional images
#[derive(Debug, Clone)]
pub struct ModelRequest {
    pub prompt: String,
    pub images: Vec<InlineImage>,
}

impl ModelRequest {
    pub fn text(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            images: Vec::new(),
        }
    }

    pub fn with_images(prompt: impl Into<String>, images: Vec<InlineImage>) -> Self {
        Self {
            prompt: prompt.into(),
            images,
        }
    }
}

/// A single model endpoint
///
/// Returns the raw response text; normalization happens in [`AiClient`].
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// Provider name for logs
    fn name(&self) -> &str;

    async fn generate(&self, request: &ModelRequest) -> Result<String, AiError>;
}

/// Typed payload expected under a call site's required key
///
/// `validate` runs after deserialization; an `Err` is treated as a schema
/// mismatch and triggers the fallback provider.
pub trait ModelOutput: DeserializeOwned {
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}
