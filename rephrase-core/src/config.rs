use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

use log::warn;

use crate::error::{LlmError, Result};
use crate::provider::Provider;

/// Environment variable for the OpenAI organization (admin) key used for billing
pub const OPENAI_ADMIN_KEY_ENV: &str = "OPENAI_ADMIN_KEY";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Provider used when none is given on the command line
    #[serde(default = "default_provider")]
    pub default_provider: String,

    /// Selected model per provider (provider key -> model id)
    #[serde(default)]
    pub models: HashMap<String, String>,

    /// Send the selected model instead of each provider's pinned model
    #[serde(default)]
    pub honor_selected_model: bool,

    /// Provider-specific configuration
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
}

fn default_provider() -> String {
    "openai".to_string()
}

/// Provider-specific configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// API key (optional, can use env var instead)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Elevated key for billing endpoints (OpenAI only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_key: Option<String>,

    /// Custom base URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl Config {
    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&config_path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        let home =
            std::env::var("HOME").map_err(|_| LlmError::ConfigError("HOME not set".into()))?;
        Ok(PathBuf::from(home).join(".config/rephrase/config.toml"))
    }

    pub fn default_provider(&self) -> Result<Provider> {
        self.default_provider.parse()
    }

    /// Selected model for a provider, falling back to its pinned model
    pub fn selected_model(&self, provider: Provider) -> &str {
        self.models
            .get(provider.config_key())
            .map(String::as_str)
            .unwrap_or(provider.pinned_model())
    }

    pub fn set_selected_model(&mut self, provider: Provider, model: &str) {
        self.models
            .insert(provider.config_key().to_string(), model.to_string());
    }

    /// Get provider config by provider
    pub fn get_provider_config(&self, provider: Provider) -> Option<&ProviderConfig> {
        self.providers.get(provider.config_key())
    }

    pub fn base_url(&self, provider: Provider) -> String {
        self.get_provider_config(provider)
            .and_then(|c| c.base_url.clone())
            .unwrap_or_else(|| provider.default_base_url().to_string())
    }

    /// API key from config, then the provider's environment variable.
    ///
    /// A missing key resolves to an empty string; the provider will then
    /// reject requests and usage probes report the key as invalid.
    pub fn api_key(&self, provider: Provider) -> String {
        if let Some(key) = self.get_provider_config(provider).and_then(|c| c.api_key.clone()) {
            return key;
        }

        std::env::var(provider.env_var()).unwrap_or_else(|_| {
            warn!(
                "No API key for {}. Set {} or add it to {}",
                provider,
                provider.env_var(),
                "~/.config/rephrase/config.toml"
            );
            String::new()
        })
    }

    /// OpenAI admin key from config, then `OPENAI_ADMIN_KEY`
    pub fn admin_key(&self) -> Option<String> {
        self.get_provider_config(Provider::OpenAi)
            .and_then(|c| c.admin_key.clone())
            .or_else(|| std::env::var(OPENAI_ADMIN_KEY_ENV).ok())
            .filter(|key| !key.is_empty())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_provider: default_provider(),
            models: HashMap::new(),
            honor_selected_model: false,
            providers: HashMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.default_provider().unwrap(), Provider::OpenAi);
        assert!(!config.honor_selected_model);
        assert_eq!(config.selected_model(Provider::Gemini), "gemini-2.0-flash");
    }

    #[test]
    fn test_selected_model_override() {
        let mut config = Config::default();
        config.set_selected_model(Provider::DeepSeek, "deepseek-reasoner");
        assert_eq!(config.selected_model(Provider::DeepSeek), "deepseek-reasoner");
        assert_eq!(config.selected_model(Provider::OpenAi), "gpt-4o");
    }

    #[test]
    fn test_config_key_beats_environment() {
        let mut config = Config::default();
        config.providers.insert(
            "deepseek".to_string(),
            ProviderConfig {
                api_key: Some("sk-from-config".to_string()),
                ..Default::default()
            },
        );
        assert_eq!(config.api_key(Provider::DeepSeek), "sk-from-config");
    }

    #[test]
    fn test_base_url_override() {
        let mut config = Config::default();
        assert_eq!(config.base_url(Provider::OpenAi), "https://api.openai.com/v1");
        config.providers.insert(
            "openai".to_string(),
            ProviderConfig {
                base_url: Some("http://127.0.0.1:9000".to_string()),
                ..Default::default()
            },
        );
        assert_eq!(config.base_url(Provider::OpenAi), "http://127.0.0.1:9000");
    }

    #[test]
    fn test_config_serialization() {
        let mut config = Config::default();
        config.honor_selected_model = true;
        config.set_selected_model(Provider::OpenAi, "gpt-4o-mini");
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert!(parsed.honor_selected_model);
        assert_eq!(parsed.selected_model(Provider::OpenAi), "gpt-4o-mini");
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let parsed: Config = toml::from_str("[providers.gemini]\napi_key = \"g-key\"\n").unwrap();
        assert_eq!(parsed.default_provider, "openai");
        assert_eq!(parsed.api_key(Provider::Gemini), "g-key");
    }

    #[test]
    fn test_config_path() {
        let path = Config::config_path().unwrap();
        assert!(path.to_string_lossy().contains(".config/rephrase/config.toml"));
    }
}
