//! HTTP plumbing shared by the adapters.

use council_application::ports::node_gateway::GatewayError;
use reqwest::{Response, StatusCode};
use serde_json::Value;
use std::time::Duration;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(15);
const MAX_ERROR_BODY_CHARS: usize = 300;

/// The client shared by every adapter.
pub(crate) fn build_client() -> reqwest::Client {
    reqwest::Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .build()
        .unwrap_or_else(|e| {
            tracing::warn!("Falling back to default HTTP client: {}", e);
            reqwest::Client::new()
        })
}

/// Map a non-success status and its body to a gateway error.
///
/// 401 and 403 mean the credential was rejected.
pub(crate) fn classify_status(status: StatusCode, body: &str) -> GatewayError {
    let message = error_message(body);
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => GatewayError::Unauthorized(message),
        _ => GatewayError::Http {
            status: status.as_u16(),
            message,
        },
    }
}

/// Pull a readable message out of a provider error body.
///
/// Handles `{"error": {"message": ..}}`, `{"error": ".."}` and
/// `{"message": ..}`; anything else is returned clipped.
pub(crate) fn error_message(body: &str) -> String {
    if let Ok(json) = serde_json::from_str::<Value>(body) {
        let nested = json
            .get("error")
            .and_then(|e| e.get("message").or(Some(e)))
            .and_then(Value::as_str);
        if let Some(msg) = nested.or_else(|| json.get("message").and_then(Value::as_str)) {
            return msg.to_string();
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "empty response body".to_string();
    }
    trimmed.chars().take(MAX_ERROR_BODY_CHARS).collect()
}

pub(crate) fn transport(e: reqwest::Error) -> GatewayError {
    if e.is_timeout() {
        GatewayError::Transport(format!("request timed out: {}", e))
    } else {
        GatewayError::Transport(e.to_string())
    }
}

/// Fail on non-success status, reading the body for the message.
pub(crate) async fn ensure_success(response: Response) -> Result<Response, GatewayError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(classify_status(status, &body))
}

/// Send a request, check its status, and parse the JSON body.
pub(crate) async fn send_json(request: reqwest::RequestBuilder) -> Result<Value, GatewayError> {
    let response = request.send().await.map_err(transport)?;
    let response = ensure_success(response).await?;
    response
        .json::<Value>()
        .await
        .map_err(|e| GatewayError::InvalidResponse(e.to_string()))
}
