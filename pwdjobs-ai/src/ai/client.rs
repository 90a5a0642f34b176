//! Primary → fallback model client

use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use pwdjobs_common::config::AiConfig;

use super::provider::GenerativeModelProvider;
use super::response::{extract_required, parse_json_object};
use super::{AiError, ModelOutput, ModelProvider, ModelRequest};

/// Model client with a single primary → secondary fallback
#[derive(Clone)]
pub struct AiClient {
    primary: Arc<dyn ModelProvider>,
    fallback: Arc<dyn ModelProvider>,
}

impl AiClient {
    pub fn new(primary: Arc<dyn ModelProvider>, fallback: Arc<dyn ModelProvider>) -> Self {
        Self { primary, fallback }
    }

    /// Build both providers from the `[ai]` config section
    pub fn from_config(config: &AiConfig, api_key: Option<String>) -> Result<Self, AiError> {
        let timeout = Duration::from_secs(config.timeout_secs);
        let primary = GenerativeModelProvider::new(
            &config.base_url,
            &config.primary_model,
            api_key.clone(),
            config.temperature,
            config.max_output_tokens,
            timeout,
        )?;
        let fallback = GenerativeModelProvider::new(
            &config.base_url,
            &config.fallback_model,
            api_key,
            config.temperature,
            config.max_output_tokens,
            timeout,
        )?;

        info!(
            primary = %config.primary_model,
            fallback = %config.fallback_model,
            "Model client configured"
        );

        Ok(Self::new(Arc::new(primary), Arc::new(fallback)))
    }

    /// Send a prompt and return the response as a JSON object
    pub async fn call(&self, prompt: &str) -> Result<Value, AiError> {
        self.call_with(&ModelRequest::text(prompt), parse_json_object)
            .await
    }

    /// Send a request and decode the value under `required_key` into `T`
    ///
    /// A response missing the key or not matching `T` counts as a provider
    /// failure, so it triggers the fallback like a network error would.
    pub async fn call_structured<T: ModelOutput>(
        &self,
        request: &ModelRequest,
        required_key: &str,
    ) -> Result<T, AiError> {
        self.call_with(request, |text| {
            let output: T = extract_required(parse_json_object(text)?, required_key)?;
            output.validate().map_err(AiError::Schema)?;
            Ok(output)
        })
        .await
    }

    async fn call_with<T, F>(&self, request: &ModelRequest, decode: F) -> Result<T, AiError>
    where
        F: Fn(&str) -> Result<T, AiError>,
    {
        let primary_err = match attempt(self.primary.as_ref(), request, &decode).await {
            Ok(value) => return Ok(value),
            Err(e) => e,
        };

        warn!(
            provider = self.primary.name(),
            error = %primary_err,
            "Primary model failed, trying fallback"
        );

        match attempt(self.fallback.as_ref(), request, &decode).await {
            Ok(value) => {
                info!(provider = self.fallback.name(), "Fallback model succeeded");
                Ok(value)
            }
            Err(fallback_err) => {
                warn!(
                    provider = self.fallback.name(),
                    error = %fallback_err,
                    "Fallback model failed"
                );
                Err(AiError::ModelUnavailable {
                    primary: primary_err.to_string(),
                    fallback: fallback_err.to_string(),
                })
            }
        }
    }
}

async fn attempt<T, F>(
    provider: &dyn ModelProvider,
    request: &ModelRequest,
    decode: &F,
) -> Result<T, AiError>
where
    F: Fn(&str) -> Result<T, AiError>,
{
    let text = provider.generate(request).await?;
    decode(&text)
}
