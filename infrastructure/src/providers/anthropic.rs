//! Anthropic Messages API adapter
//!
//! `x-api-key` + `anthropic-version` header auth, `content[0].text`
//! responses, `content_block_delta` streaming frames.

use super::http::{ensure_success, send_json, transport};
use super::sse::{Frame, Termination, parse_json, pump};
use super::{ProviderAdapter, ProviderRequest};
use async_trait::async_trait;
use council_application::ports::node_gateway::{GatewayError, StreamHandle};
use council_domain::ProtocolKind;
use serde_json::{Value, json};
use tracing::debug;

pub const ANTHROPIC_VERSION: &str = "2023-06-01";
pub const MAX_TOKENS: u32 = 1024;

/// Adapter for the Anthropic Messages API.
pub struct AnthropicAdapter {
    client: reqwest::Client,
}

impl AnthropicAdapter {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    fn post(&self, request: &ProviderRequest, stream: bool) -> reqwest::RequestBuilder {
        let url = format!("{}/messages", request.endpoint);
        debug!("POST {} (model: {}, stream: {})", url, request.model, stream);
        self.client
            .post(url)
            .header("x-api-key", request.api_key.as_deref().unwrap_or_default())
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request_body(request, stream))
    }
}

/// Build the Messages API request body.
pub(crate) fn request_body(request: &ProviderRequest, stream: bool) -> Value {
    let mut body = json!({
        "model": request.model,
        "max_tokens": MAX_TOKENS,
        "messages": [{"role": "user", "content": request.prompt}],
    });
    if let Some(system) = request.system() {
        body["system"] = Value::String(system.to_string());
    }
    if stream {
        body["stream"] = Value::Bool(true);
    }
    body
}

pub(crate) fn parse_completion(body: &Value) -> String {
    body.pointer("/content/0/text")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Parse one streaming frame by its `type` field.
pub(crate) fn parse_frame(data: &str) -> Frame {
    let Some(json) = parse_json(data) else {
        return Frame::Skip;
    };
    match json.get("type").and_then(Value::as_str) {
        Some("content_block_delta") => json
            .pointer("/delta/text")
            .and_then(Value::as_str)
            .map(|t| Frame::Delta(t.to_string()))
            .unwrap_or(Frame::Skip),
        Some("message_stop") => Frame::Done,
        Some("error") => Frame::Error(
            json.pointer("/error/message")
                .and_then(Value::as_str)
                .unwrap_or("provider reported a stream error")
                .to_string(),
        ),
        _ => Frame::Skip,
    }
}

#[async_trait]
impl ProviderAdapter for AnthropicAdapter {
    fn protocol(&self) -> ProtocolKind {
        ProtocolKind::Anthropic
    }

    async fn generate(&self, request: &ProviderRequest) -> Result<String, GatewayError> {
        let body = send_json(self.post(request, false)).await?;
        Ok(parse_completion(&body))
    }

    async fn generate_stream(
        &self,
        request: ProviderRequest,
    ) -> Result<StreamHandle, GatewayError> {
        let response = self.post(&request, true).send().await.map_err(transport)?;
        let response = ensure_success(response).await?;
        Ok(pump(response, parse_frame, Termination::Marker))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> ProviderRequest {
        ProviderRequest {
            endpoint: "https://api.anthropic.com/v1".to_string(),
            api_key: Some("sk-ant-test".to_string()),
            model: "claude-3-5-sonnet-20240620".to_string(),
            prompt: "Summarise the debate.".to_string(),
            system: Some("Focus on semantic nuance.".to_string()),
        }
    }

    #[test]
    fn test_request_body() {
        let body = request_body(&request(), false);
        assert_eq!(body["max_tokens"], 1024);
        assert_eq!(body["system"], "Focus on semantic nuance.");
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"].as_array().unwrap().len(), 1);
        assert!(body.get("stream").is_none());

        let mut bare = request();
        bare.system = None;
        let body = request_body(&bare, true);
        assert!(body.get("system").is_none());
        assert_eq!(body["stream"], true);
    }

    #[test]
    fn test_parse_completion() {
        let body = json!({"content": [{"type": "text", "text": "Verdict."}]});
        assert_eq!(parse_completion(&body), "Verdict.");
        assert_eq!(parse_completion(&json!({})), "");
    }

    #[test]
    fn test_parse_frames() {
        assert_eq!(
            parse_frame(r#"{"type":"content_block_delta","index":0,"delta":{"type":"text_delta","text":"Hi"}}"#),
            Frame::Delta("Hi".to_string())
        );
        assert_eq!(parse_frame(r#"{"type":"message_start","message":{}}"#), Frame::Skip);
        assert_eq!(parse_frame(r#"{"type":"ping"}"#), Frame::Skip);
        assert_eq!(parse_frame(r#"{"type":"message_stop"}"#), Frame::Done);
        assert_eq!(
            parse_frame(r#"{"type":"error","error":{"type":"overloaded_error","message":"Overloaded"}}"#),
            Frame::Error("Overloaded".to_string())
        );
        assert_eq!(parse_frame("{\"type\":\"content_blo"), Frame::Skip);
    }
}
