//! OpenAI provider
//!
//! Chat completions, the `gpt` model catalog, and a two-step usage probe:
//! validate the key by listing models, then read this month's costs with the
//! organization admin key if one is configured.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Local;
use log::{debug, warn};

use crate::catalog::{filter_openai_models, parse_listing};
use crate::error::Result;
use crate::provider::{LlmProvider, PromptRequest, Provider};
use crate::transport::{HttpRequest, Transport, build_url};
use crate::usage::{
    DETAIL_KEY_INVALID, DETAIL_OPENAI_KEY_VALID, DETAIL_OPENAI_MONTH, UsageInfo, month_window,
    sum_cost_cents,
};

use super::{ProviderSettings, exchange, openai_compatible, require_body};

const PROVIDER: Provider = Provider::OpenAi;

pub struct OpenAiProvider {
    transport: Arc<dyn Transport>,
    settings: ProviderSettings,
    admin_key: Option<String>,
}

impl OpenAiProvider {
    pub fn new(
        transport: Arc<dyn Transport>,
        settings: ProviderSettings,
        admin_key: Option<String>,
    ) -> Self {
        Self {
            transport,
            settings,
            admin_key,
        }
    }

    fn models_request(&self) -> Result<HttpRequest> {
        let url = build_url(PROVIDER, &self.settings.base_url, "/models", &[])?;
        Ok(HttpRequest::get(url).bearer(&self.settings.api_key))
    }

    /// This month's spend in dollars, or `None` if the costs call fails
    async fn month_costs(&self, admin_key: &str) -> Option<f64> {
        let (start, end) = month_window(&Local::now());
        let (start, end) = (start.to_string(), end.to_string());
        let url = build_url(
            PROVIDER,
            &self.settings.base_url,
            "/organization/costs",
            &[("start_time", start.as_str()), ("end_time", end.as_str())],
        )
        .ok()?;

        let response = match self.transport.send(HttpRequest::get(url).bearer(admin_key)).await {
            Ok(response) => response,
            Err(e) => {
                debug!("OpenAI costs request failed: {}", e);
                return None;
            }
        };
        if !response.is_ok() {
            debug!("OpenAI costs returned HTTP {}", response.status);
            return None;
        }

        let json: serde_json::Value = serde_json::from_slice(&response.body).ok()?;
        Some(sum_cost_cents(&json) / 100.0)
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    async fn send_prompt(&self, request: &PromptRequest) -> Result<String> {
        openai_compatible::complete(
            self.transport.as_ref(),
            PROVIDER,
            &self.settings,
            "/chat/completions",
            request,
        )
        .await
    }

    async fn fetch_models(&self) -> Result<Vec<String>> {
        let response = exchange(self.transport.as_ref(), PROVIDER, self.models_request()?).await?;
        let body = require_body(PROVIDER, response)?;
        let ids = parse_listing(&body, PROVIDER, "data", "id")?;
        Ok(filter_openai_models(ids))
    }

    async fn fetch_usage(&self) -> UsageInfo {
        let request = match self.models_request() {
            Ok(request) => request,
            Err(e) => return UsageInfo::unavailable(PROVIDER, e),
        };
        let response = match self.transport.send(request).await {
            Ok(response) => response,
            Err(e) => {
                warn!("OpenAI key check failed: {}", e);
                return UsageInfo::unavailable(PROVIDER, e);
            }
        };
        if !response.is_ok() {
            return UsageInfo::new(PROVIDER, 0.0, DETAIL_KEY_INVALID);
        }

        let Some(admin_key) = self.admin_key.as_deref() else {
            debug!("No OpenAI admin key configured, skipping costs");
            return UsageInfo::new(PROVIDER, 0.0, DETAIL_OPENAI_KEY_VALID);
        };

        match self.month_costs(admin_key).await {
            Some(total) => UsageInfo::new(PROVIDER, total, DETAIL_OPENAI_MONTH),
            None => UsageInfo::new(PROVIDER, 0.0, DETAIL_OPENAI_KEY_VALID),
        }
    }

    fn kind(&self) -> Provider {
        PROVIDER
    }
}
