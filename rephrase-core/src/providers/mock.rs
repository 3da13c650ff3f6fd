//! Mock LLM provider for testing
//!
//! Lets callers of [`crate::ProviderClient`] be tested without building HTTP
//! fixtures: canned replies, a canned model list and a canned usage record.

use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::{LlmError, Result};
use crate::provider::{LlmProvider, PromptRequest, Provider};
use crate::usage::UsageInfo;

pub struct MockProvider {
    kind: Provider,
    /// Error to return from `send_prompt` and `fetch_models` (None = succeed)
    fail_with: Mutex<Option<LlmError>>,
    /// Reply text on success
    reply: String,
    models: Vec<String>,
    usage: UsageInfo,
    call_count: AtomicUsize,
    prompts: Mutex<Vec<PromptRequest>>,
}

impl MockProvider {
    /// Create a provider that always succeeds with `reply`
    pub fn replying(kind: Provider, reply: &str) -> Self {
        Self {
            kind,
            fail_with: Mutex::new(None),
            reply: reply.to_string(),
            models: Vec::new(),
            usage: UsageInfo::new(kind, 0.0, "mock"),
            call_count: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Create a provider whose prompt and model calls always fail
    pub fn failing(kind: Provider, error: LlmError) -> Self {
        let provider = Self::replying(kind, "");
        *provider.fail_with.lock().unwrap() = Some(error);
        provider
    }

    pub fn with_models(mut self, models: &[&str]) -> Self {
        self.models = models.iter().map(|m| m.to_string()).collect();
        self
    }

    pub fn with_usage(mut self, usage: UsageInfo) -> Self {
        self.usage = usage;
        self
    }

    /// Get the number of calls made to any capability
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Prompts received so far
    pub fn prompts(&self) -> Vec<PromptRequest> {
        self.prompts.lock().unwrap().clone()
    }

    fn check_failure(&self) -> Result<()> {
        match self.fail_with.lock().unwrap().as_ref() {
            Some(err) => Err(clone_error(err)),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl LlmProvider for MockProvider {
    async fn send_prompt(&self, request: &PromptRequest) -> Result<String> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(request.clone());
        self.check_failure()?;
        Ok(self.reply.trim().to_string())
    }

    async fn fetch_models(&self) -> Result<Vec<String>> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.check_failure()?;
        Ok(self.models.clone())
    }

    async fn fetch_usage(&self) -> UsageInfo {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.usage.clone()
    }

    fn kind(&self) -> Provider {
        self.kind
    }
}

/// Clone an LlmError (needed because LlmError doesn't implement Clone)
fn clone_error(err: &LlmError) -> LlmError {
    match err {
        LlmError::InvalidUrl { provider, url } => LlmError::InvalidUrl {
            provider: *provider,
            url: url.clone(),
        },
        LlmError::Network { provider, message } => LlmError::Network {
            provider: *provider,
            message: message.clone(),
        },
        LlmError::NoData { provider } => LlmError::NoData {
            provider: *provider,
        },
        LlmError::InvalidJson { provider, message } => LlmError::InvalidJson {
            provider: *provider,
            message: message.clone(),
        },
        LlmError::InvalidResponseStructure { provider } => LlmError::InvalidResponseStructure {
            provider: *provider,
        },
        LlmError::ProviderError { provider, message } => LlmError::ProviderError {
            provider: *provider,
            message: message.clone(),
        },
        LlmError::ConfigError(s) => LlmError::ConfigError(s.clone()),
        // For Io and Toml errors, we create a generic error since they can't be cloned
        LlmError::Io(_) => LlmError::ConfigError("IO error (mock)".to_string()),
        LlmError::TomlParse(_) => LlmError::ConfigError("TOML parse error (mock)".to_string()),
        LlmError::TomlSerialize(_) => {
            LlmError::ConfigError("TOML serialize error (mock)".to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[tokio::test]
    async fn test_replying() {
        let provider = MockProvider::replying(Provider::OpenAi, "  success \n");
        let request = PromptRequest::new(Provider::OpenAi, "gpt-4o", "test");

        let result = provider.send_prompt(&request).await;
        assert_eq!(result.unwrap(), "success");
        assert_eq!(provider.call_count(), 1);
        assert_eq!(provider.prompts()[0].prompt, "test");
    }

    #[tokio::test]
    async fn test_failing_repeats_error() {
        let provider = MockProvider::failing(
            Provider::DeepSeek,
            LlmError::NoData {
                provider: Provider::DeepSeek,
            },
        );
        let request = PromptRequest::new(Provider::DeepSeek, "deepseek-chat", "test");

        for _ in 0..3 {
            let err = provider.send_prompt(&request).await.unwrap_err();
            assert_eq!(err.kind(), ErrorKind::NoData);
        }
        assert!(provider.fetch_models().await.is_err());
        assert_eq!(provider.call_count(), 4);
    }
}
