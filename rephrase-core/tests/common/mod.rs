//! Shared helpers for integration tests.

#![allow(dead_code)]

use rephrase_core::{Config, Provider, ProviderConfig};

/// Config pointing every provider at `base_url` with fixed test keys
pub fn config_for(base_url: &str) -> Config {
    config_with_bases(|_| base_url.to_string())
}

/// Config with a per-provider base URL and fixed test keys
pub fn config_with_bases(base_url: impl Fn(Provider) -> String) -> Config {
    let mut config = Config::default();
    for provider in Provider::ALL {
        config.providers.insert(
            provider.config_key().to_string(),
            ProviderConfig {
                api_key: Some(format!("{}-test-key", provider.config_key())),
                admin_key: None,
                base_url: Some(base_url(provider)),
            },
        );
    }
    config
}

/// Same as [`config_for`] with an OpenAI admin key
pub fn config_with_admin(base_url: &str, admin_key: &str) -> Config {
    let mut config = config_for(base_url);
    if let Some(openai) = config.providers.get_mut("openai") {
        openai.admin_key = Some(admin_key.to_string());
    }
    config
}
