//! Gemini provider (Google Generative Language API)
//!
//! The key travels as a `key` query parameter. There is no billing API for
//! API-key access, so the usage probe only validates the key.

use std::sync::Arc;

use async_trait::async_trait;
use log::warn;
use serde_json::json;

use crate::catalog::{filter_gemini_models, parse_listing};
use crate::decode::decode;
use crate::error::Result;
use crate::provider::{LlmProvider, PromptRequest, Provider};
use crate::transport::{HttpRequest, Transport, build_url};
use crate::usage::{DETAIL_GEMINI_FREE_TIER, DETAIL_KEY_INVALID, UsageInfo};

use super::{ProviderSettings, exchange, require_body};

const PROVIDER: Provider = Provider::Gemini;

pub struct GeminiProvider {
    transport: Arc<dyn Transport>,
    settings: ProviderSettings,
}

impl GeminiProvider {
    pub fn new(transport: Arc<dyn Transport>, settings: ProviderSettings) -> Self {
        Self {
            transport,
            settings,
        }
    }

    fn models_request(&self) -> Result<HttpRequest> {
        let url = build_url(
            PROVIDER,
            &self.settings.base_url,
            "/models",
            &[("key", self.settings.api_key.as_str())],
        )?;
        Ok(HttpRequest::get(url))
    }
}

/// `contents[].parts[].text` body; Gemini takes no temperature here
fn generate_body(prompt: &str) -> serde_json::Value {
    json!({
        "contents": [
            {"parts": [{"text": prompt}]}
        ]
    })
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    async fn send_prompt(&self, request: &PromptRequest) -> Result<String> {
        let model = self.settings.model_for(PROVIDER, &request.model);
        let url = build_url(
            PROVIDER,
            &self.settings.base_url,
            &format!("/models/{}:generateContent", model),
            &[("key", self.settings.api_key.as_str())],
        )?;

        let http = HttpRequest::post_json(url, &generate_body(&request.prompt));
        let response = exchange(self.transport.as_ref(), PROVIDER, http).await?;
        let body = require_body(PROVIDER, response)?;
        decode(&body, PROVIDER)
    }

    async fn fetch_models(&self) -> Result<Vec<String>> {
        let response = exchange(self.transport.as_ref(), PROVIDER, self.models_request()?).await?;
        let body = require_body(PROVIDER, response)?;
        let names = parse_listing(&body, PROVIDER, "models", "name")?;
        Ok(filter_gemini_models(names))
    }

    async fn fetch_usage(&self) -> UsageInfo {
        let request = match self.models_request() {
            Ok(request) => request,
            Err(e) => return UsageInfo::unavailable(PROVIDER, e),
        };
        match self.transport.send(request).await {
            Ok(response) if response.is_ok() => {
                UsageInfo::new(PROVIDER, 0.0, DETAIL_GEMINI_FREE_TIER)
            }
            Ok(_) => UsageInfo::new(PROVIDER, 0.0, DETAIL_KEY_INVALID),
            Err(e) => {
                warn!("Gemini key check failed: {}", e);
                UsageInfo::unavailable(PROVIDER, e)
            }
        }
    }

    fn kind(&self) -> Provider {
        PROVIDER
    }
}
