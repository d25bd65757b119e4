//! The remote-completion seam.
//!
//! [`AnalysisClient`] is the single trait the pipeline talks to: one prompt
//! in, one completion out, or a [`ClientError`] the retry loop can act on.
//! Tests inject scripted mocks; production code uses [`LlmClient`], a thin
//! wrapper over an `edgequake-llm` provider.
//!
//! The model identifier is bound at client construction (providers carry
//! their model), so the pipeline never threads model names through call
//! sites.

use crate::config::AnalyzerConfig;
use crate::error::{AnalyzerError, ClientError};
use async_trait::async_trait;
use edgequake_llm::{ChatMessage, CompletionOptions, LLMProvider, ProviderFactory};
use std::sync::Arc;
use tracing::info;

/// A text-completion service invoked with a prompt.
///
/// Implementations must be cheap to call repeatedly: the analysis driver
/// retries failed calls and the batch orchestrator issues one call per
/// cache-missing document.
#[async_trait]
pub trait AnalysisClient: Send + Sync {
    /// Run one completion for `prompt`.
    ///
    /// Any transport or provider failure maps to [`ClientError::Api`]; the
    /// caller decides whether to retry.
    async fn complete(&self, prompt: &str) -> Result<String, ClientError>;
}

/// Production client backed by an `edgequake-llm` provider.
pub struct LlmClient {
    provider: Arc<dyn LLMProvider>,
    temperature: f32,
    max_tokens: usize,
}

impl LlmClient {
    /// Wrap a pre-constructed provider (useful for custom middleware).
    pub fn new(provider: Arc<dyn LLMProvider>) -> Self {
        Self {
            provider,
            temperature: 0.2,
            max_tokens: 2048,
        }
    }

    /// Build a provider for the configured model via the provider factory.
    ///
    /// The factory reads the provider's API key from the environment
    /// (`GEMINI_API_KEY` for the default provider); the key's presence was
    /// already validated by [`AnalyzerConfig::from_env`], so a failure here
    /// means the key is present but rejected or the provider name is unknown.
    pub fn from_config(config: &AnalyzerConfig) -> Result<Self, AnalyzerError> {
        let provider =
            ProviderFactory::create_llm_provider(&config.provider_name, &config.model_name)
                .map_err(|e| AnalyzerError::ProviderNotConfigured {
                    provider: config.provider_name.clone(),
                    hint: format!("{e}"),
                })?;
        info!(
            "LLM client initialised: {} / {}",
            config.provider_name, config.model_name
        );
        Ok(Self::new(provider))
    }
}

#[async_trait]
impl AnalysisClient for LlmClient {
    async fn complete(&self, prompt: &str) -> Result<String, ClientError> {
        let messages = vec![ChatMessage::user(prompt)];
        let options = CompletionOptions {
            temperature: Some(self.temperature),
            max_tokens: Some(self.max_tokens),
            ..Default::default()
        };

        match self.provider.chat(&messages, Some(&options)).await {
            Ok(response) => Ok(response.content),
            Err(e) => Err(ClientError::Api(e.to_string())),
        }
    }
}
