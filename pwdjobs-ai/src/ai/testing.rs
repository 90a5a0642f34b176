//! Canned providers for unit tests

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use super::{AiClient, AiError, ModelProvider, ModelRequest};

/// Replies with fixed text, or fails, and counts calls
pub(crate) struct CannedProvider {
    reply: Option<String>,
    calls: AtomicUsize,
}

impl CannedProvider {
    pub(crate) fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Some(text.to_string()),
            calls: AtomicUsize::new(0),
        })
    }

    pub(crate) fn failing() -> Arc<Self> {
        Arc::new(Self {
            reply: None,
            calls: AtomicUsize::new(0),
        })
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ModelProvider for CannedProvider {
    fn name(&self) -> &str {
        "canned"
    }

    async fn generate(&self, _request: &ModelRequest) -> Result<String, AiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reply
            .clone()
            .ok_or_else(|| AiError::Network("connection refused".into()))
    }
}

/// Client whose primary replies with `text` and whose fallback fails
pub(crate) fn client_replying(text: &str) -> AiClient {
    AiClient::new(CannedProvider::replying(text), CannedProvider::failing())
}

/// Client where both providers fail
pub(crate) fn client_failing() -> AiClient {
    AiClient::new(CannedProvider::failing(), CannedProvider::failing())
}
