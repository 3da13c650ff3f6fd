//! Model catalog post-processing and the caller-owned model cache.

use std::collections::HashMap;

use log::debug;
use serde_json::Value;

use crate::client::ProviderClient;
use crate::error::{LlmError, Result};
use crate::provider::Provider;

/// OpenAI's listing includes image, audio and embedding models; only
/// identifiers containing this marker are offered.
pub const OPENAI_MODEL_MARKER: &str = "gpt";
/// Gemini names come back as `models/<id>`.
pub const GEMINI_NAME_PREFIX: &str = "models/";
pub const GEMINI_MODEL_MARKER: &str = "gemini";

/// Extract the string at `field` of every entry in the `list` array.
///
/// Entries without the field are skipped.
pub fn parse_listing(raw: &[u8], provider: Provider, list: &str, field: &str) -> Result<Vec<String>> {
    let json: Value = serde_json::from_slice(raw).map_err(|e| LlmError::InvalidJson {
        provider,
        message: e.to_string(),
    })?;

    if let Some(message) = json
        .get("error")
        .and_then(|e| e.get("message"))
        .and_then(Value::as_str)
    {
        return Err(LlmError::ProviderError {
            provider,
            message: message.to_string(),
        });
    }

    let entries = json
        .get(list)
        .and_then(Value::as_array)
        .ok_or(LlmError::InvalidResponseStructure { provider })?;

    Ok(entries
        .iter()
        .filter_map(|entry| entry.get(field).and_then(Value::as_str))
        .map(str::to_string)
        .collect())
}

pub fn sort_models(mut models: Vec<String>) -> Vec<String> {
    models.sort();
    models
}

pub fn filter_openai_models(ids: Vec<String>) -> Vec<String> {
    sort_models(
        ids.into_iter()
            .filter(|id| id.contains(OPENAI_MODEL_MARKER))
            .collect(),
    )
}

pub fn filter_gemini_models(names: Vec<String>) -> Vec<String> {
    sort_models(
        names
            .into_iter()
            .map(|name| name.replace(GEMINI_NAME_PREFIX, ""))
            .filter(|id| id.contains(GEMINI_MODEL_MARKER))
            .collect(),
    )
}

/// Fallback list as owned strings
pub fn default_models(provider: Provider) -> Vec<String> {
    provider
        .default_models()
        .iter()
        .map(|m| m.to_string())
        .collect()
}

/// Provider-keyed model lists, owned by the caller.
///
/// Entries live until the cache is dropped. Wrap it in a mutex to share it
/// between concurrent callers.
#[derive(Debug, Default, Clone)]
pub struct ModelCache {
    entries: HashMap<Provider, Vec<String>>,
}

impl ModelCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, provider: Provider) -> Option<&[String]> {
        self.entries.get(&provider).map(Vec::as_slice)
    }

    pub fn insert(&mut self, provider: Provider, models: Vec<String>) {
        self.entries.insert(provider, models);
    }

    /// Return cached models, fetching them on a miss.
    ///
    /// A successful fetch is cached. A failed fetch yields the provider's
    /// fallback list, which is not cached so the next call tries again.
    pub async fn get_or_fetch(&mut self, client: &ProviderClient, provider: Provider) -> Vec<String> {
        if let Some(models) = self.entries.get(&provider) {
            return models.clone();
        }

        match client.fetch_models(provider).await {
            Ok(models) => {
                self.entries.insert(provider, models.clone());
                models
            }
            Err(e) => {
                debug!("Using default models for {}: {}", provider, e);
                default_models(provider)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use serde_json::json;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_openai_filter_keeps_gpt_and_sorts() {
        let ids = strings(&["gpt-4o", "dall-e-3", "gpt-3.5-turbo"]);
        assert_eq!(filter_openai_models(ids), strings(&["gpt-3.5-turbo", "gpt-4o"]));
    }

    #[test]
    fn test_gemini_filter_strips_prefix() {
        let names = strings(&["models/gemini-2.0-flash", "models/embedding-001"]);
        assert_eq!(filter_gemini_models(names), strings(&["gemini-2.0-flash"]));
    }

    #[test]
    fn test_sort_models_is_lexicographic() {
        let sorted = sort_models(strings(&["deepseek-reasoner", "deepseek-chat"]));
        assert_eq!(sorted, strings(&["deepseek-chat", "deepseek-reasoner"]));
    }

    #[test]
    fn test_parse_listing_skips_entries_without_field() {
        let body = json!({"data": [{"id": "a"}, {"object": "model"}, {"id": "b"}]}).to_string();
        let ids = parse_listing(body.as_bytes(), Provider::OpenAi, "data", "id").unwrap();
        assert_eq!(ids, strings(&["a", "b"]));
    }

    #[test]
    fn test_parse_listing_failures() {
        let err = parse_listing(b"<html>", Provider::DeepSeek, "data", "id").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidJson);

        let err = parse_listing(b"{\"object\":\"list\"}", Provider::DeepSeek, "data", "id").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidResponseStructure);

        let body = json!({"error": {"message": "Incorrect API key provided"}}).to_string();
        let err = parse_listing(body.as_bytes(), Provider::OpenAi, "data", "id").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ProviderError);
    }

    #[test]
    fn test_cache_insert_and_get() {
        let mut cache = ModelCache::new();
        assert!(cache.get(Provider::Gemini).is_none());
        cache.insert(Provider::Gemini, strings(&["gemini-2.0-flash"]));
        assert_eq!(cache.get(Provider::Gemini), Some(&strings(&["gemini-2.0-flash"])[..]));
        assert!(cache.get(Provider::OpenAi).is_none());
    }
}
