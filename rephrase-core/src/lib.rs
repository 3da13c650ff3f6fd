//! Provider client core for the rephrase tools
//!
//! One interface over three LLM vendors:
//! - OpenAI (chat completions, costs API)
//! - Gemini (generateContent, key validation only)
//! - DeepSeek (chat completions, balance API)
//!
//! Each vendor gets its own request shape and response decoding. Model
//! listing and usage probing sit behind the same [`LlmProvider`] trait.

pub mod catalog;
pub mod client;
pub mod config;
pub mod decode;
pub mod error;
pub mod provider;
pub mod providers;
pub mod transport;
pub mod usage;

pub use catalog::ModelCache;
pub use client::{ProviderClient, UsageReport};
pub use config::{Config, ProviderConfig};
pub use error::{ErrorKind, LlmError, Result};
pub use provider::{LlmProvider, PromptRequest, Provider};
pub use providers::{MockProvider, ProviderSettings, get_provider};
pub use usage::UsageInfo;
