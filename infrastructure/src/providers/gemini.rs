//! Gemini adapter (Generative Language REST API)
//!
//! `POST {base}/models/{model}:generateContent` and
//! `:streamGenerateContent?alt=sse`, authenticated with `x-goog-api-key`.

use super::http::{ensure_success, send_json, transport};
use super::sse::{Frame, Termination, parse_json, pump};
use super::{ProviderAdapter, ProviderRequest, TEMPERATURE};
use async_trait::async_trait;
use council_application::ports::node_gateway::{GatewayError, StreamHandle};
use council_domain::ProtocolKind;
use serde_json::{Value, json};
use tracing::debug;

/// Adapter for Google's Gemini models.
pub struct GeminiAdapter {
    client: reqwest::Client,
}

impl GeminiAdapter {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    fn post(&self, request: &ProviderRequest, stream: bool) -> reqwest::RequestBuilder {
        let url = if stream {
            format!(
                "{}/models/{}:streamGenerateContent?alt=sse",
                request.endpoint, request.model
            )
        } else {
            format!("{}/models/{}:generateContent", request.endpoint, request.model)
        };
        debug!("POST {}", url);
        self.client
            .post(url)
            .header("x-goog-api-key", request.api_key.as_deref().unwrap_or_default())
            .json(&request_body(request))
    }
}

pub(crate) fn request_body(request: &ProviderRequest) -> Value {
    let mut body = json!({
        "contents": [{"role": "user", "parts": [{"text": request.prompt}]}],
        "generationConfig": {"temperature": TEMPERATURE},
    });
    if let Some(system) = request.system() {
        body["systemInstruction"] = json!({"parts": [{"text": system}]});
    }
    body
}

/// Concatenate `candidates[0].content.parts[*].text`.
pub(crate) fn candidate_text(body: &Value) -> String {
    body.pointer("/candidates/0/content/parts")
        .and_then(Value::as_array)
        .map(|parts| {
            parts
                .iter()
                .filter_map(|p| p.get("text").and_then(Value::as_str))
                .collect::<String>()
        })
        .unwrap_or_default()
}

pub(crate) fn parse_frame(data: &str) -> Frame {
    let Some(json) = parse_json(data) else {
        return Frame::Skip;
    };
    if let Some(message) = json.pointer("/error/message").and_then(Value::as_str) {
        return Frame::Error(message.to_string());
    }
    let text = candidate_text(&json);
    if text.is_empty() {
        Frame::Skip
    } else {
        Frame::Delta(text)
    }
}

#[async_trait]
impl ProviderAdapter for GeminiAdapter {
    fn protocol(&self) -> ProtocolKind {
        ProtocolKind::Gemini
    }

    async fn generate(&self, request: &ProviderRequest) -> Result<String, GatewayError> {
        let body = send_json(self.post(request, false)).await?;
        Ok(candidate_text(&body))
    }

    async fn generate_stream(
        &self,
        request: ProviderRequest,
    ) -> Result<StreamHandle, GatewayError> {
        let response = self.post(&request, true).send().await.map_err(transport)?;
        let response = ensure_success(response).await?;
        Ok(pump(response, parse_frame, Termination::EndOfBody))
    }
}
