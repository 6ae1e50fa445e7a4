//! HTTP key verifier
//!
//! Sends one minimal-cost request per provider to confirm that a key is
//! accepted. Any network or parse failure counts as invalid.

use crate::providers::anthropic::ANTHROPIC_VERSION;
use async_trait::async_trait;
use council_application::ports::key_verifier::{KeyValidity, KeyVerifier};
use council_domain::{ProtocolKind, ProviderKind};
use reqwest::StatusCode;
use std::time::Duration;
use tracing::{debug, warn};

/// Model looked up to verify a Google key
const GEMINI_PROBE_MODEL: &str = "gemini-1.5-flash";
/// Cheapest model for the Anthropic 1-token probe
const ANTHROPIC_PROBE_MODEL: &str = "claude-3-haiku-20240307";
const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// The probe used for a provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Probe {
    /// No request; the verdict is fixed
    Skip(KeyValidity),
    /// `GET {base}/models/{model}` with `x-goog-api-key`
    GeminiModel { url: String },
    /// One-token message; anything but 401 is valid
    AnthropicMessage { url: String },
    /// `GET {base}/models` with bearer auth; only 200 is valid
    ListModels { url: String },
}

/// Choose the probe for a provider and key against `base`.
pub(crate) fn probe_for(provider: ProviderKind, key: &str, base: &str) -> Probe {
    if key.trim().is_empty() {
        return Probe::Skip(KeyValidity::Invalid);
    }
    if provider.is_local() {
        return Probe::Skip(KeyValidity::Valid);
    }
    let base = base.trim_end_matches('/');
    match provider.protocol() {
        ProtocolKind::Gemini => Probe::GeminiModel {
            url: format!("{}/models/{}", base, GEMINI_PROBE_MODEL),
        },
        ProtocolKind::Anthropic => Probe::AnthropicMessage {
            url: format!("{}/messages", base),
        },
        ProtocolKind::OpenAiCompatible => Probe::ListModels {
            url: format!("{}/models", base),
        },
    }
}

/// Interpret a probe's response status.
pub(crate) fn judge(probe: &Probe, status: StatusCode) -> KeyValidity {
    let valid = match probe {
        Probe::Skip(validity) => return *validity,
        Probe::AnthropicMessage { .. } => status != StatusCode::UNAUTHORIZED,
        Probe::GeminiModel { .. } => status.is_success(),
        Probe::ListModels { .. } => status == StatusCode::OK,
    };
    if valid {
        KeyValidity::Valid
    } else {
        KeyValidity::Invalid
    }
}

/// [`KeyVerifier`] issuing live HTTP probes.
pub struct HttpKeyVerifier {
    client: reqwest::Client,
    base_url: Option<String>,
}

impl HttpKeyVerifier {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(PROBE_TIMEOUT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            client,
            base_url: None,
        }
    }

    /// Send every probe to `url` instead of the provider's own endpoint.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    fn base_for(&self, provider: ProviderKind) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| provider.default_base_url())
    }

    fn request(&self, probe: &Probe, key: &str) -> Option<reqwest::RequestBuilder> {
        let request = match probe {
            Probe::Skip(_) => return None,
            Probe::GeminiModel { url } => self.client.get(url).header("x-goog-api-key", key),
            Probe::AnthropicMessage { url } => self
                .client
                .post(url)
                .header("x-api-key", key)
                .header("anthropic-version", ANTHROPIC_VERSION)
                .json(&serde_json::json!({
                    "model": ANTHROPIC_PROBE_MODEL,
                    "max_tokens": 1,
                    "messages": [{"role": "user", "content": "hi"}],
                })),
            Probe::ListModels { url } => self.client.get(url).bearer_auth(key),
        };
        Some(request)
    }
}

impl Default for HttpKeyVerifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KeyVerifier for HttpKeyVerifier {
    async fn verify(&self, provider: ProviderKind, key: &str) -> KeyValidity {
        let probe = probe_for(provider, key, self.base_for(provider));
        let Some(request) = self.request(&probe, key.trim()) else {
            return judge(&probe, StatusCode::OK);
        };

        match request.send().await {
            Ok(response) => {
                let validity = judge(&probe, response.status());
                debug!(%provider, status = %response.status(), "Key probe: {:?}", validity);
                validity
            }
            Err(e) => {
                warn!(%provider, "Key verification failed: {}", e);
                KeyValidity::Invalid
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_key_is_invalid_without_request() {
        assert_eq!(probe_for(ProviderKind::OpenAi, "  ", ""), Probe::Skip(KeyValidity::Invalid));
        assert_eq!(probe_for(ProviderKind::Ollama, "", ""), Probe::Skip(KeyValidity::Invalid));
    }

    #[test]
    fn test_local_kinds_valid_by_declaration() {
        assert_eq!(probe_for(ProviderKind::Custom, "k", ""), Probe::Skip(KeyValidity::Valid));
        assert_eq!(
            judge(&Probe::Skip(KeyValidity::Valid), StatusCode::INTERNAL_SERVER_ERROR),
            KeyValidity::Valid
        );
    }

    #[test]
    fn test_probe_urls() {
        assert_eq!(
            probe_for(ProviderKind::Google, "k", ProviderKind::Google.default_base_url()),
            Probe::GeminiModel {
                url: "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash"
                    .to_string()
            }
        );
        assert_eq!(
            probe_for(ProviderKind::Groq, "k", ProviderKind::Groq.default_base_url()),
            Probe::ListModels {
                url: "https://api.groq.com/openai/v1/models".to_string()
            }
        );
        assert!(matches!(
            probe_for(ProviderKind::Anthropic, "k", ProviderKind::Anthropic.default_base_url()),
            Probe::AnthropicMessage { .. }
        ));
    }

    #[test]
    fn test_anthropic_only_rejects_401() {
        let probe = probe_for(ProviderKind::Anthropic, "k", ProviderKind::Anthropic.default_base_url());
        assert_eq!(judge(&probe, StatusCode::BAD_REQUEST), KeyValidity::Valid);
        assert_eq!(judge(&probe, StatusCode::TOO_MANY_REQUESTS), KeyValidity::Valid);
        assert_eq!(judge(&probe, StatusCode::UNAUTHORIZED), KeyValidity::Invalid);
    }

    #[test]
    fn test_list_models_requires_200() {
        let probe = probe_for(ProviderKind::DeepSeek, "k", ProviderKind::DeepSeek.default_base_url());
        assert_eq!(judge(&probe, StatusCode::OK), KeyValidity::Valid);
        assert_eq!(judge(&probe, StatusCode::NO_CONTENT), KeyValidity::Invalid);
        assert_eq!(judge(&probe, StatusCode::FORBIDDEN), KeyValidity::Invalid);
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_invalid() {
        let verifier = HttpKeyVerifier::new().with_base_url("http://127.0.0.1:9");
        for provider in [ProviderKind::OpenAi, ProviderKind::Anthropic, ProviderKind::Google] {
            assert_eq!(verifier.verify(provider, "k").await, KeyValidity::Invalid);
        }
    }

    #[test]
    fn test_base_url_override() {
        let verifier = HttpKeyVerifier::new().with_base_url("http://localhost:8080/v1");
        assert_eq!(
            probe_for(
                ProviderKind::Groq,
                "k",
                verifier.base_for(ProviderKind::Groq)
            ),
            Probe::ListModels {
                url: "http://localhost:8080/v1/models".to_string()
            }
        );
    }
}
