//! HTTP exchange layer
//!
//! Provider clients describe a request as an [`HttpRequest`] and hand it to a
//! [`Transport`]. The production transport is [`ReqwestTransport`]; tests use
//! [`mock::MockTransport`].

pub mod mock;

use std::collections::BTreeMap;

use async_trait::async_trait;
use reqwest::{Client, Method, Url};
use thiserror::Error;

use crate::error::{LlmError, Result};
use crate::provider::Provider;

/// Failure to complete an HTTP exchange at all (no connectivity, TLS, ...)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct TransportError(pub String);

/// One outbound request
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: Url,
    pub headers: BTreeMap<String, String>,
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    pub fn get(url: Url) -> Self {
        Self {
            method: Method::GET,
            url,
            headers: BTreeMap::new(),
            body: None,
        }
    }

    /// POST with a JSON body
    pub fn post_json(url: Url, body: &serde_json::Value) -> Self {
        let mut headers = BTreeMap::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        Self {
            method: Method::POST,
            url,
            headers,
            body: Some(body.to_string().into_bytes()),
        }
    }

    pub fn bearer(mut self, token: &str) -> Self {
        self.headers
            .insert("Authorization".to_string(), format!("Bearer {}", token));
        self
    }
}

/// Raw result of an exchange
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// Performs exactly one HTTP exchange per call
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> std::result::Result<HttpResponse, TransportError>;
}

/// Transport backed by a shared `reqwest` client
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> std::result::Result<HttpResponse, TransportError> {
        let mut builder = self.client.request(request.method, request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        // Gemini carries its key in the query string, so errors drop the URL.
        let response = builder
            .send()
            .await
            .map_err(|e| TransportError(e.without_url().to_string()))?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(|e| {
            TransportError(format!("Failed to read response body: {}", e.without_url()))
        })?;

        Ok(HttpResponse {
            status,
            body: body.to_vec(),
        })
    }
}

/// Join `base` and `path` and append `query`, rejecting anything that is not
/// an absolute http(s) URL.
pub fn build_url(
    provider: Provider,
    base: &str,
    path: &str,
    query: &[(&str, &str)],
) -> Result<Url> {
    let raw = format!("{}{}", base.trim_end_matches('/'), path);
    let invalid = || LlmError::InvalidUrl {
        provider,
        url: raw.clone(),
    };

    let mut url = Url::parse(&raw).map_err(|_| invalid())?;
    if !matches!(url.scheme(), "http" | "https") || url.host().is_none() {
        return Err(invalid());
    }
    if !query.is_empty() {
        url.query_pairs_mut().extend_pairs(query);
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_url_joins_base_and_path() {
        let url = build_url(Provider::OpenAi, "https://api.openai.com/v1/", "/models", &[]).unwrap();
        assert_eq!(url.as_str(), "https://api.openai.com/v1/models");
    }

    #[test]
    fn test_build_url_appends_query() {
        let url = build_url(
            Provider::Gemini,
            "https://generativelanguage.googleapis.com/v1beta",
            "/models",
            &[("key", "abc")],
        )
        .unwrap();
        assert_eq!(url.path(), "/v1beta/models");
        assert_eq!(url.query(), Some("key=abc"));
    }

    #[test]
    fn test_build_url_rejects_relative_and_non_http() {
        for base in ["not a url", "/relative", "ftp://example.com"] {
            let err = build_url(Provider::DeepSeek, base, "/models", &[]).unwrap_err();
            assert_eq!(err.kind(), crate::error::ErrorKind::InvalidUrl);
        }
    }

    #[test]
    fn test_bearer_header() {
        let url = Url::parse("https://example.com").unwrap();
        let request = HttpRequest::get(url).bearer("sk-test");
        assert_eq!(request.headers["Authorization"], "Bearer sk-test");
    }
}
