//! Wrapper around the provider client for the CLI
//!
//! Resolves the provider and model from flags and configuration.

use anyhow::{Context, Result};
use log::debug;
use rephrase_core::{Config, Provider, ProviderClient};

pub struct LlmClient {
    client: ProviderClient,
    config: Config,
}

impl LlmClient {
    pub fn new() -> Result<Self> {
        let config = Config::load().context("Failed to load configuration")?;
        let client = ProviderClient::from_config(&config);
        Ok(Self { client, config })
    }

    pub fn client(&self) -> &ProviderClient {
        &self.client
    }

    /// Provider from the flag, or the configured default
    pub fn resolve_provider(&self, flag: Option<&str>) -> Result<Provider> {
        match flag {
            Some(name) => name.parse().context(format!("Unknown provider: {}", name)),
            None => self
                .config
                .default_provider()
                .context("Invalid default_provider in configuration"),
        }
    }

    /// Model from the flag, or the configured selection
    pub fn resolve_model(&self, provider: Provider, flag: Option<&str>) -> String {
        flag.map(str::to_string)
            .unwrap_or_else(|| self.config.selected_model(provider).to_string())
    }

    /// Send a prompt and return the reply text
    pub async fn complete(&self, prompt: &str, provider: Provider, model: &str) -> Result<String> {
        debug!("Using provider {} (model: {})", provider, model);
        let reply = self.client.send_prompt(prompt, model, provider).await?;
        debug!("Received {} bytes from {}", reply.len(), provider);
        Ok(reply)
    }
}
