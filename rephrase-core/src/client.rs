//! Provider-agnostic entry point
//!
//! [`ProviderClient`] holds one [`LlmProvider`] per [`Provider`] and routes
//! each call by the provider the caller names. Calls are independent: no
//! ordering between them, no cancellation, and late results are the caller's
//! to discard.

use std::sync::Arc;

use log::debug;

use crate::catalog::default_models;
use crate::config::Config;
use crate::error::Result;
use crate::provider::{LlmProvider, PromptRequest, Provider};
use crate::providers::get_provider;
use crate::transport::{ReqwestTransport, Transport};
use crate::usage::UsageInfo;

/// Usage records for all three providers, gathered concurrently
#[derive(Debug, Clone, PartialEq)]
pub struct UsageReport {
    pub openai: UsageInfo,
    pub gemini: UsageInfo,
    pub deepseek: UsageInfo,
}

impl UsageReport {
    /// Records in [`Provider::ALL`] order
    pub fn rows(&self) -> [&UsageInfo; 3] {
        [&self.openai, &self.gemini, &self.deepseek]
    }
}

pub struct ProviderClient {
    openai: Box<dyn LlmProvider>,
    gemini: Box<dyn LlmProvider>,
    deepseek: Box<dyn LlmProvider>,
}

impl ProviderClient {
    /// Assemble a client from explicit provider implementations.
    ///
    /// Each implementation must report the provider of its slot.
    pub fn new(
        openai: Box<dyn LlmProvider>,
        gemini: Box<dyn LlmProvider>,
        deepseek: Box<dyn LlmProvider>,
    ) -> Self {
        debug_assert_eq!(openai.kind(), Provider::OpenAi);
        debug_assert_eq!(gemini.kind(), Provider::Gemini);
        debug_assert_eq!(deepseek.kind(), Provider::DeepSeek);
        Self {
            openai,
            gemini,
            deepseek,
        }
    }

    /// Build all three providers from configuration over one transport
    pub fn with_transport(config: &Config, transport: Arc<dyn Transport>) -> Self {
        Self::new(
            get_provider(Provider::OpenAi, config, transport.clone()),
            get_provider(Provider::Gemini, config, transport.clone()),
            get_provider(Provider::DeepSeek, config, transport),
        )
    }

    /// Build from configuration using the default HTTP transport
    pub fn from_config(config: &Config) -> Self {
        Self::with_transport(config, Arc::new(ReqwestTransport::new()))
    }

    pub fn provider(&self, provider: Provider) -> &dyn LlmProvider {
        match provider {
            Provider::OpenAi => self.openai.as_ref(),
            Provider::Gemini => self.gemini.as_ref(),
            Provider::DeepSeek => self.deepseek.as_ref(),
        }
    }

    /// Send `prompt` to `provider` and return the trimmed reply
    pub async fn send_prompt(&self, prompt: &str, model: &str, provider: Provider) -> Result<String> {
        let request = PromptRequest::new(provider, model, prompt);
        debug!("Sending prompt to {} (model: {})", provider, model);
        self.provider(provider).send_prompt(&request).await
    }

    pub async fn fetch_models(&self, provider: Provider) -> Result<Vec<String>> {
        self.provider(provider).fetch_models().await
    }

    /// Fetch models, substituting the provider's default list on any failure
    pub async fn fetch_models_or_default(&self, provider: Provider) -> Vec<String> {
        match self.fetch_models(provider).await {
            Ok(models) => models,
            Err(e) => {
                debug!("Falling back to default models for {}: {}", provider, e);
                default_models(provider)
            }
        }
    }

    pub async fn fetch_usage(&self, provider: Provider) -> UsageInfo {
        self.provider(provider).fetch_usage().await
    }

    /// Probe all three providers concurrently.
    ///
    /// Resolves once every probe has settled; a slow probe delays only the
    /// join, not the other probes.
    pub async fn fetch_all_usage(&self) -> UsageReport {
        let (openai, gemini, deepseek) = tokio::join!(
            self.openai.fetch_usage(),
            self.gemini.fetch_usage(),
            self.deepseek.fetch_usage(),
        );
        UsageReport {
            openai,
            gemini,
            deepseek,
        }
    }
}
