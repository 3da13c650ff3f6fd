//! Normalizes each provider's completion envelope into reply text.

use serde_json::Value;

use crate::error::{LlmError, Result};
use crate::provider::Provider;

/// Decode a raw completion body.
///
/// An embedded `error.message` wins over any success payload, since some
/// providers report errors with HTTP 200.
pub fn decode(raw: &[u8], provider: Provider) -> Result<String> {
    let json: Value = serde_json::from_slice(raw).map_err(|e| LlmError::InvalidJson {
        provider,
        message: e.to_string(),
    })?;
    if !json.is_object() {
        return Err(LlmError::InvalidJson {
            provider,
            message: "top-level value is not an object".to_string(),
        });
    }

    if let Some(message) = embedded_error(&json) {
        return Err(LlmError::ProviderError {
            provider,
            message: message.to_string(),
        });
    }

    let text = match provider {
        Provider::OpenAi | Provider::DeepSeek => chat_completion_text(&json),
        Provider::Gemini => candidate_text(&json),
    };

    text.map(|t| t.trim().to_string())
        .ok_or(LlmError::InvalidResponseStructure { provider })
}

fn embedded_error(json: &Value) -> Option<&str> {
    json.get("error")?.get("message")?.as_str()
}

/// `choices[0].message.content`
fn chat_completion_text(json: &Value) -> Option<&str> {
    json.get("choices")?
        .get(0)?
        .get("message")?
        .get("content")?
        .as_str()
}

/// `candidates[0].content.parts[0].text`
fn candidate_text(json: &Value) -> Option<&str> {
    json.get("candidates")?
        .get(0)?
        .get("content")?
        .get("parts")?
        .get(0)?
        .get("text")?
        .as_str()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use serde_json::json;

    fn bytes(value: Value) -> Vec<u8> {
        value.to_string().into_bytes()
    }

    #[test]
    fn test_chat_completion_success_is_trimmed() {
        let body = bytes(json!({
            "choices": [{"message": {"role": "assistant", "content": "\n  Hello there.  \n"}}]
        }));
        for provider in [Provider::OpenAi, Provider::DeepSeek] {
            assert_eq!(decode(&body, provider).unwrap(), "Hello there.");
        }
    }

    #[test]
    fn test_gemini_success_is_trimmed() {
        let body = bytes(json!({
            "candidates": [{"content": {"parts": [{"text": " Fixed sentence.\n"}], "role": "model"}}]
        }));
        assert_eq!(decode(&body, Provider::Gemini).unwrap(), "Fixed sentence.");
    }

    #[test]
    fn test_embedded_error_wins_over_payload() {
        let body = bytes(json!({
            "error": {"message": "Insufficient Balance", "code": "invalid_request_error"},
            "choices": [{"message": {"content": "should not be read"}}],
            "candidates": [{"content": {"parts": [{"text": "nor this"}]}}]
        }));
        for provider in Provider::ALL {
            let err = decode(&body, provider).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::ProviderError);
            let message = err.to_string();
            assert!(message.contains(provider.display_name()), "{message}");
            assert!(message.contains("Insufficient Balance"), "{message}");
        }
    }

    #[test]
    fn test_truncated_json_is_invalid_json() {
        let body = br#"{"choices": [{"message": {"content": "hel"#;
        for provider in Provider::ALL {
            let err = decode(body, provider).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidJson);
        }
    }

    #[test]
    fn test_non_object_is_invalid_json() {
        let bodies: [&[u8]; 3] = [b"[1, 2]", b"\"text\"", b"null"];
        for body in bodies {
            let err = decode(body, Provider::OpenAi).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidJson);
        }
    }

    #[test]
    fn test_missing_path_is_invalid_structure() {
        let cases = [
            json!({}),
            json!({"choices": []}),
            json!({"choices": [{"message": {}}]}),
            json!({"choices": [{"message": {"content": 42}}]}),
            json!({"choices": "nope"}),
        ];
        for case in cases {
            let err = decode(&bytes(case.clone()), Provider::DeepSeek).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidResponseStructure, "{case}");
            assert!(err.to_string().contains("DeepSeek"));
        }
    }

    #[test]
    fn test_gemini_missing_parts_is_invalid_structure() {
        let body = bytes(json!({"candidates": [{"content": {"parts": []}}]}));
        let err = decode(&body, Provider::Gemini).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidResponseStructure);
    }

    #[test]
    fn test_error_without_message_falls_through_to_payload() {
        let body = bytes(json!({
            "error": {"code": 500},
            "choices": [{"message": {"content": "ok"}}]
        }));
        assert_eq!(decode(&body, Provider::OpenAi).unwrap(), "ok");
    }
}
