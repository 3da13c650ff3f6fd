//! LLM provider implementations

mod deepseek;
mod gemini;
pub mod mock;
mod openai;
mod openai_compatible;

pub use deepseek::DeepSeekProvider;
pub use gemini::GeminiProvider;
pub use mock::MockProvider;
pub use openai::OpenAiProvider;

use std::fmt;
use std::sync::Arc;

use log::debug;

use crate::config::Config;
use crate::error::{LlmError, Result};
use crate::provider::{LlmProvider, Provider};
use crate::transport::{HttpRequest, HttpResponse, Transport};

/// Connection settings shared by all provider clients
#[derive(Clone)]
pub struct ProviderSettings {
    pub base_url: String,
    pub api_key: String,
    /// Send the caller's model instead of the provider's pinned one
    pub honor_selected_model: bool,
}

impl fmt::Debug for ProviderSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderSettings")
            .field("base_url", &self.base_url)
            .field("has_api_key", &!self.api_key.is_empty())
            .field("honor_selected_model", &self.honor_selected_model)
            .finish()
    }
}

impl ProviderSettings {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            honor_selected_model: false,
        }
    }

    pub fn from_config(config: &Config, provider: Provider) -> Self {
        Self {
            base_url: config.base_url(provider),
            api_key: config.api_key(provider),
            honor_selected_model: config.honor_selected_model,
        }
    }

    pub fn honoring_selected_model(mut self, honor: bool) -> Self {
        self.honor_selected_model = honor;
        self
    }

    /// Model identifier to put on the wire for a request
    pub fn model_for<'a>(&self, provider: Provider, requested: &'a str) -> &'a str {
        if self.honor_selected_model && !requested.is_empty() {
            return requested;
        }
        let pinned = provider.pinned_model();
        if requested != pinned {
            debug!(
                "{} ignores selected model {:?}, requesting {}",
                provider, requested, pinned
            );
        }
        pinned
    }
}

/// Build the client for one provider
pub fn get_provider(
    provider: Provider,
    config: &Config,
    transport: Arc<dyn Transport>,
) -> Box<dyn LlmProvider> {
    let settings = ProviderSettings::from_config(config, provider);
    match provider {
        Provider::OpenAi => Box::new(OpenAiProvider::new(transport, settings, config.admin_key())),
        Provider::Gemini => Box::new(GeminiProvider::new(transport, settings)),
        Provider::DeepSeek => Box::new(DeepSeekProvider::new(transport, settings)),
    }
}

/// Run one exchange, mapping transport failures to [`LlmError::Network`].
///
/// Only the path is logged; Gemini carries its key in the query string.
pub(crate) async fn exchange(
    transport: &dyn Transport,
    provider: Provider,
    request: HttpRequest,
) -> Result<HttpResponse> {
    debug!("{} {} {}", provider, request.method, request.url.path());
    let response = transport
        .send(request)
        .await
        .map_err(|e| LlmError::Network {
            provider,
            message: e.to_string(),
        })?;
    debug!("{} responded with HTTP {}", provider, response.status);
    Ok(response)
}

/// Body of a response, or [`LlmError::NoData`] when it is empty
pub(crate) fn require_body(provider: Provider, response: HttpResponse) -> Result<Vec<u8>> {
    if response.body.is_empty() {
        return Err(LlmError::NoData { provider });
    }
    Ok(response.body)
}
