//! Provider module
//!
//! This module contains the text-generation abstraction the summarizer calls
//! into, and its Ollama implementation.

pub mod base;
pub mod ollama;

pub use base::{CompletionResponse, GenerationOptions, Message, Provider, TokenUsage};
pub use ollama::OllamaProvider;

use crate::config::ProviderConfig;
use crate::error::{Result, SummarizerError};
use async_trait::async_trait;
use tokio::sync::OnceCell;

/// Create a provider instance based on configuration
///
/// # Arguments
///
/// * `config` - Provider configuration
///
/// # Errors
///
/// Returns error if provider type is invalid or initialization fails
pub fn create_provider(config: &ProviderConfig) -> Result<Box<dyn Provider>> {
    match config.provider_type.as_str() {
        "ollama" => Ok(Box::new(OllamaProvider::new(config.ollama.clone())?)),
        other => Err(SummarizerError::Provider(format!("Unknown provider type: {}", other)).into()),
    }
}

/// Provider built from its configuration on the first generation call
///
/// Commands that never generate text do not pay for the HTTP client.
pub struct LazyProvider {
    config: ProviderConfig,
    inner: OnceCell<Box<dyn Provider>>,
}

impl LazyProvider {
    pub fn new(config: ProviderConfig) -> Self {
        Self {
            config,
            inner: OnceCell::new(),
        }
    }

    /// Whether the underlying provider has been created
    pub fn is_initialized(&self) -> bool {
        self.inner.initialized()
    }

    async fn provider(&self) -> Result<&dyn Provider> {
        let provider = self
            .inner
            .get_or_try_init(|| async { create_provider(&self.config) })
            .await?;
        Ok(provider.as_ref())
    }
}

#[async_trait]
impl Provider for LazyProvider {
    async fn complete(
        &self,
        messages: &[Message],
        options: GenerationOptions,
    ) -> Result<CompletionResponse> {
        self.provider().await?.complete(messages, options).await
    }

    fn get_current_model(&self) -> Result<String> {
        match self.inner.get() {
            Some(provider) => provider.get_current_model(),
            None => Ok(self.config.ollama.model.clone()),
        }
    }
}
