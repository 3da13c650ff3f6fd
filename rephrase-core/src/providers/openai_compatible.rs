//! Chat-completions request shape shared by OpenAI and DeepSeek

use serde::Serialize;

use crate::decode::decode;
use crate::error::Result;
use crate::provider::{PromptRequest, Provider};
use crate::transport::{HttpRequest, Transport, build_url};

use super::{ProviderSettings, exchange, require_body};

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: [Message<'a>; 1],
    temperature: f64,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

/// Request body carrying the prompt as the single user message
pub(crate) fn chat_body(model: &str, request: &PromptRequest) -> serde_json::Value {
    let body = ChatCompletionRequest {
        model,
        messages: [Message {
            role: "user",
            content: &request.prompt,
        }],
        temperature: request.temperature,
    };
    serde_json::json!(body)
}

/// POST a chat completion to `base_url + path` and decode the reply
pub(crate) async fn complete(
    transport: &dyn Transport,
    provider: Provider,
    settings: &ProviderSettings,
    path: &str,
    request: &PromptRequest,
) -> Result<String> {
    let url = build_url(provider, &settings.base_url, path, &[])?;
    let model = settings.model_for(provider, &request.model);
    let http = HttpRequest::post_json(url, &chat_body(model, request)).bearer(&settings.api_key);

    let response = exchange(transport, provider, http).await?;
    let body = require_body(provider, response)?;
    decode(&body, provider)
}
