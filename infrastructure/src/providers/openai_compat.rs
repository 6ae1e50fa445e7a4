//! OpenAI-compatible chat completion adapter
//!
//! Serves every provider speaking the `/chat/completions` dialect (OpenAI,
//! Groq, DeepSeek, Mistral, OpenRouter, NVIDIA, Zhipu, Ollama, custom
//! endpoints), parameterised by base URL and bearer token.

use super::http::{ensure_success, send_json, transport};
use super::sse::{Frame, Termination, parse_json, pump};
use super::{ProviderAdapter, ProviderRequest, TEMPERATURE};
use async_trait::async_trait;
use council_application::ports::node_gateway::{GatewayError, StreamHandle};
use council_domain::ProtocolKind;
use serde_json::{Value, json};
use tracing::debug;

/// Adapter for OpenAI-style chat completion endpoints.
pub struct OpenAiCompatibleAdapter {
    client: reqwest::Client,
}

impl OpenAiCompatibleAdapter {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    fn post(&self, request: &ProviderRequest, stream: bool) -> reqwest::RequestBuilder {
        let url = format!("{}/chat/completions", request.endpoint);
        debug!("POST {} (model: {}, stream: {})", url, request.model, stream);
        let builder = self.client.post(url).json(&request_body(request, stream));
        match request.api_key.as_deref() {
            Some(key) => builder.bearer_auth(key),
            None => builder,
        }
    }
}

/// Build the chat completion request body.
pub(crate) fn request_body(request: &ProviderRequest, stream: bool) -> Value {
    let mut messages = Vec::with_capacity(2);
    if let Some(system) = request.system() {
        messages.push(json!({"role": "system", "content": system}));
    }
    messages.push(json!({"role": "user", "content": request.prompt}));

    let mut body = json!({
        "model": request.model,
        "messages": messages,
        "temperature": TEMPERATURE,
    });
    if stream {
        body["stream"] = Value::Bool(true);
    }
    body
}

/// Extract `choices[0].message.content`; a missing field is empty text.
pub(crate) fn parse_completion(body: &Value) -> String {
    body.pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Parse one streaming frame.
pub(crate) fn parse_frame(data: &str) -> Frame {
    if data.trim() == "[DONE]" {
        return Frame::Done;
    }
    let Some(json) = parse_json(data) else {
        return Frame::Skip;
    };
    if let Some(error) = json.get("error") {
        let message = error
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("provider reported a stream error");
        return Frame::Error(message.to_string());
    }
    match json
        .pointer("/choices/0/delta/content")
        .and_then(Value::as_str)
    {
        Some(text) => Frame::Delta(text.to_string()),
        None => Frame::Skip,
    }
}

#[async_trait]
impl ProviderAdapter for OpenAiCompatibleAdapter {
    fn protocol(&self) -> ProtocolKind {
        ProtocolKind::OpenAiCompatible
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

    fn request(system: Option<&str>) -> ProviderRequest {
        ProviderRequest {
            endpoint: "https://api.groq.com/openai/v1".to_string(),
            api_key: Some("gsk-test".to_string()),
            model: "llama3-70b-8192".to_string(),
            prompt: "Is Rust memory safe?".to_string(),
            system: system.map(String::from),
        }
    }

    #[test]
    fn test_request_body_with_system() {
        let body = request_body(&request(Some("Be terse.")), false);
        assert_eq!(body["model"], "llama3-70b-8192");
        assert_eq!(body["temperature"], 0.7);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"], "Be terse.");
        assert_eq!(body["messages"][1]["role"], "user");
        assert!(body.get("stream").is_none());
    }

    #[test]
    fn test_request_body_without_system_streams() {
        let body = request_body(&request(Some("   ")), true);
        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0]["content"], "Is Rust memory safe?");
        assert_eq!(body["stream"], true);
    }

    #[test]
    fn test_parse_completion() {
        let body = json!({"choices": [{"message": {"role": "assistant", "content": "Yes."}}]});
        assert_eq!(parse_completion(&body), "Yes.");
        assert_eq!(parse_completion(&json!({"choices": []})), "");
    }

    #[test]
    fn test_parse_frames() {
        assert_eq!(
            parse_frame(r#"{"choices":[{"delta":{"content":"Hel"}}]}"#),
            Frame::Delta("Hel".to_string())
        );
        assert_eq!(parse_frame("[DONE]"), Frame::Done);
        assert_eq!(parse_frame(r#"{"choices":[{"delta":{"role":"assistant"}}]}"#), Frame::Skip);
        assert_eq!(parse_frame(r#"{"choices":[{"delta":{"cont"#), Frame::Skip);
        assert_eq!(
            parse_frame(r#"{"error":{"message":"overloaded"}}"#),
            Frame::Error("overloaded".to_string())
        );
    }
}
