use thiserror::Error;

use crate::provider::Provider;

/// Coarse classification of a failed call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidUrl,
    Network,
    NoData,
    InvalidJson,
    InvalidResponseStructure,
    ProviderError,
    Config,
}

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("{provider}: invalid request URL: {url}")]
    InvalidUrl { provider: Provider, url: String },

    #[error("{provider} request failed: {message}")]
    Network { provider: Provider, message: String },

    #[error("{provider} returned no data")]
    NoData { provider: Provider },

    #[error("{provider} returned invalid JSON: {message}")]
    InvalidJson { provider: Provider, message: String },

    #[error("{provider} returned an unexpected response structure")]
    InvalidResponseStructure { provider: Provider },

    #[error("{provider} API Error: {message}")]
    ProviderError { provider: Provider, message: String },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

impl LlmError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidUrl { .. } => ErrorKind::InvalidUrl,
            Self::Network { .. } => ErrorKind::Network,
            Self::NoData { .. } => ErrorKind::NoData,
            Self::InvalidJson { .. } => ErrorKind::InvalidJson,
            Self::InvalidResponseStructure { .. } => ErrorKind::InvalidResponseStructure,
            Self::ProviderError { .. } => ErrorKind::ProviderError,
            Self::ConfigError(_) | Self::Io(_) | Self::TomlParse(_) | Self::TomlSerialize(_) => {
                ErrorKind::Config
            }
        }
    }

    /// The provider this error came from, if any.
    pub fn provider(&self) -> Option<Provider> {
        match self {
            Self::InvalidUrl { provider, .. }
            | Self::Network { provider, .. }
            | Self::NoData { provider }
            | Self::InvalidJson { provider, .. }
            | Self::InvalidResponseStructure { provider }
            | Self::ProviderError { provider, .. } => Some(*provider),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, LlmError>;
