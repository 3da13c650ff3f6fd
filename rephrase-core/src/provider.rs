use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{LlmError, Result};
use crate::usage::UsageInfo;

/// Sampling temperature sent to providers that accept one.
pub const DEFAULT_TEMPERATURE: f64 = 0.7;

/// The supported LLM vendors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    OpenAi,
    Gemini,
    DeepSeek,
}

impl Provider {
    pub const ALL: [Provider; 3] = [Provider::OpenAi, Provider::Gemini, Provider::DeepSeek];

    /// Name used in messages and usage records
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::OpenAi => "OpenAI",
            Self::Gemini => "Gemini",
            Self::DeepSeek => "DeepSeek",
        }
    }

    /// Key used for this provider in the configuration file
    pub fn config_key(&self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Gemini => "gemini",
            Self::DeepSeek => "deepseek",
        }
    }

    /// Environment variable consulted for the API key
    pub fn env_var(&self) -> &'static str {
        match self {
            Self::OpenAi => "OPENAI_API_KEY",
            Self::Gemini => "GEMINI_API_KEY",
            Self::DeepSeek => "DEEPSEEK_API_KEY",
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            Self::OpenAi => "https://api.openai.com/v1",
            Self::Gemini => "https://generativelanguage.googleapis.com/v1beta",
            Self::DeepSeek => "https://api.deepseek.com",
        }
    }

    /// Model requested when the caller's selection is not honored
    pub fn pinned_model(&self) -> &'static str {
        match self {
            Self::OpenAi => "gpt-4o",
            Self::Gemini => "gemini-2.0-flash",
            Self::DeepSeek => "deepseek-chat",
        }
    }

    /// Model list offered when the catalog cannot be fetched
    pub fn default_models(&self) -> &'static [&'static str] {
        match self {
            Self::OpenAi => &["gpt-3.5-turbo", "gpt-4o", "gpt-4o-mini"],
            Self::Gemini => &["gemini-2.0-flash", "gemini-2.5-flash", "gemini-2.5-pro"],
            Self::DeepSeek => &["deepseek-chat", "deepseek-reasoner"],
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Provider {
    type Err = LlmError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "openai" | "open-ai" | "chatgpt" => Ok(Self::OpenAi),
            "gemini" | "google" => Ok(Self::Gemini),
            "deepseek" | "deep-seek" => Ok(Self::DeepSeek),
            _ => Err(LlmError::ConfigError(format!("Unknown provider: {}", s))),
        }
    }
}

/// A single prompt to send to a provider
#[derive(Debug, Clone)]
pub struct PromptRequest {
    pub provider: Provider,
    pub model: String,
    pub prompt: String,
    pub temperature: f64,
}

impl PromptRequest {
    pub fn new(provider: Provider, model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            prompt: prompt.into(),
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

/// Capabilities every provider client offers
///
/// Each call performs its own network exchange and resolves exactly once.
/// There is no retry, caching or cancellation at this level.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Send a prompt and return the trimmed reply text
    async fn send_prompt(&self, request: &PromptRequest) -> Result<String>;

    /// List the provider's models, filtered and sorted by name
    async fn fetch_models(&self) -> Result<Vec<String>>;

    /// Validate the key and report billing where the provider exposes it.
    ///
    /// Never fails: problems are described in [`UsageInfo::details`].
    async fn fetch_usage(&self) -> UsageInfo;

    /// Which provider this client talks to
    fn kind(&self) -> Provider;

    /// Get the provider name for display
    fn name(&self) -> &'static str {
        self.kind().display_name()
    }
}
