//! DeepSeek provider
//!
//! OpenAI-compatible chat completions; usage comes from the balance endpoint.

use std::sync::Arc;

use async_trait::async_trait;
use log::warn;

use crate::catalog::{parse_listing, sort_models};
use crate::error::Result;
use crate::provider::{LlmProvider, PromptRequest, Provider};
use crate::transport::{HttpRequest, Transport, build_url};
use crate::usage::{DETAIL_DEEPSEEK_BALANCE, DETAIL_KEY_INVALID, UsageInfo, sum_balances};

use super::{ProviderSettings, exchange, openai_compatible, require_body};

const PROVIDER: Provider = Provider::DeepSeek;

pub struct DeepSeekProvider {
    transport: Arc<dyn Transport>,
    settings: ProviderSettings,
}

impl DeepSeekProvider {
    pub fn new(transport: Arc<dyn Transport>, settings: ProviderSettings) -> Self {
        Self {
            transport,
            settings,
        }
    }

    fn get(&self, path: &str) -> Result<HttpRequest> {
        let url = build_url(PROVIDER, &self.settings.base_url, path, &[])?;
        Ok(HttpRequest::get(url).bearer(&self.settings.api_key))
    }
}

#[async_trait]
impl LlmProvider for DeepSeekProvider {
    async fn send_prompt(&self, request: &PromptRequest) -> Result<String> {
        openai_compatible::complete(
            self.transport.as_ref(),
            PROVIDER,
            &self.settings,
            "/v1/chat/completions",
            request,
        )
        .await
    }

    async fn fetch_models(&self) -> Result<Vec<String>> {
        let response = exchange(self.transport.as_ref(), PROVIDER, self.get("/models")?).await?;
        let body = require_body(PROVIDER, response)?;
        let ids = parse_listing(&body, PROVIDER, "data", "id")?;
        Ok(sort_models(ids))
    }

    async fn fetch_usage(&self) -> UsageInfo {
        let request = match self.get("/user/balance") {
            Ok(request) => request,
            Err(e) => return UsageInfo::unavailable(PROVIDER, e),
        };
        let response = match self.transport.send(request).await {
            Ok(response) => response,
            Err(e) => {
                warn!("DeepSeek balance request failed: {}", e);
                return UsageInfo::unavailable(PROVIDER, e);
            }
        };

        match response.status {
            200 => {}
            401 | 403 => return UsageInfo::new(PROVIDER, 0.0, DETAIL_KEY_INVALID),
            status => return UsageInfo::unavailable(PROVIDER, format!("HTTP {}", status)),
        }

        match serde_json::from_slice::<serde_json::Value>(&response.body) {
            Ok(json) => UsageInfo::new(PROVIDER, sum_balances(&json), DETAIL_DEEPSEEK_BALANCE),
            Err(e) => UsageInfo::unavailable(PROVIDER, format!("invalid balance response: {}", e)),
        }
    }

    fn kind(&self) -> Provider {
        PROVIDER
    }
}
