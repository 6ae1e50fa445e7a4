//! Provider kinds and their wire protocols.

use crate::core::error::DomainError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Wire protocol spoken by a provider.
///
/// Providers that share a protocol share one adapter implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProtocolKind {
    /// `POST {base}/chat/completions`, bearer auth, `choices[0]` envelopes.
    OpenAiCompatible,
    /// `POST {base}/messages`, `x-api-key` + version header, `content[0].text`.
    Anthropic,
    /// Generative Language API, `candidates[0].content.parts[*].text`.
    Gemini,
}

/// A model provider (Value Object)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    Google,
    OpenAi,
    Anthropic,
    Groq,
    DeepSeek,
    Mistral,
    OpenRouter,
    Nvidia,
    Zhipu,
    /// Self-hosted Ollama server
    Ollama,
    /// Any OpenAI-compatible endpoint at a user-supplied URL
    Custom,
}

impl ProviderKind {
    /// Every provider, in catalogue order.
    pub const ALL: [ProviderKind; 11] = [
        ProviderKind::Google,
        ProviderKind::OpenAi,
        ProviderKind::Anthropic,
        ProviderKind::Groq,
        ProviderKind::DeepSeek,
        ProviderKind::Mistral,
        ProviderKind::OpenRouter,
        ProviderKind::Nvidia,
        ProviderKind::Zhipu,
        ProviderKind::Ollama,
        ProviderKind::Custom,
    ];

    /// Stable identifier used in configuration files.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Google => "google",
            ProviderKind::OpenAi => "openai",
            ProviderKind::Anthropic => "anthropic",
            ProviderKind::Groq => "groq",
            ProviderKind::DeepSeek => "deepseek",
            ProviderKind::Mistral => "mistral",
            ProviderKind::OpenRouter => "openrouter",
            ProviderKind::Nvidia => "nvidia",
            ProviderKind::Zhipu => "zhipu",
            ProviderKind::Ollama => "ollama",
            ProviderKind::Custom => "custom",
        }
    }

    /// Human-readable name.
    pub fn display_name(&self) -> &'static str {
        match self {
            ProviderKind::Google => "Google (Direct)",
            ProviderKind::OpenAi => "OpenAI",
            ProviderKind::Anthropic => "Anthropic",
            ProviderKind::Groq => "Groq",
            ProviderKind::DeepSeek => "DeepSeek",
            ProviderKind::Mistral => "Mistral AI",
            ProviderKind::OpenRouter => "OpenRouter",
            ProviderKind::Nvidia => "NVIDIA",
            ProviderKind::Zhipu => "Zhipu GLM",
            ProviderKind::Ollama => "Ollama (Local)",
            ProviderKind::Custom => "Custom (OpenAI Compatible)",
        }
    }

    pub fn protocol(&self) -> ProtocolKind {
        match self {
            ProviderKind::Google => ProtocolKind::Gemini,
            ProviderKind::Anthropic => ProtocolKind::Anthropic,
            _ => ProtocolKind::OpenAiCompatible,
        }
    }

    /// Default API base URL (no trailing slash).
    pub fn default_base_url(&self) -> &'static str {
        match self {
            ProviderKind::Google => "https://generativelanguage.googleapis.com/v1beta",
            ProviderKind::OpenAi => "https://api.openai.com/v1",
            ProviderKind::Anthropic => "https://api.anthropic.com/v1",
            ProviderKind::Groq => "https://api.groq.com/openai/v1",
            ProviderKind::DeepSeek => "https://api.deepseek.com",
            ProviderKind::Mistral => "https://api.mistral.ai/v1",
            ProviderKind::OpenRouter => "https://openrouter.ai/api/v1",
            ProviderKind::Nvidia => "https://integrate.api.nvidia.com/v1",
            ProviderKind::Zhipu => "https://open.bigmodel.cn/api/paas/v4",
            ProviderKind::Ollama => "http://localhost:11434/v1",
            ProviderKind::Custom => "http://localhost:1234/v1",
        }
    }

    /// Whether a node's custom endpoint may replace the default base URL.
    ///
    /// First-party hosted APIs always use their canonical endpoint.
    pub fn allows_custom_endpoint(&self) -> bool {
        !matches!(
            self,
            ProviderKind::OpenAi | ProviderKind::Mistral | ProviderKind::OpenRouter
        )
    }

    /// Whether calls require a credential.
    ///
    /// Self-hosted kinds are ready by declaration.
    pub fn requires_credential(&self) -> bool {
        !self.is_local()
    }

    /// Self-hosted or user-hosted providers.
    pub fn is_local(&self) -> bool {
        matches!(self, ProviderKind::Ollama | ProviderKind::Custom)
    }

    /// Environment variables consulted, in order, when no key is configured.
    pub fn key_env_vars(&self) -> &'static [&'static str] {
        match self {
            ProviderKind::Google => &["GEMINI_API_KEY", "GOOGLE_API_KEY"],
            ProviderKind::OpenAi => &["OPENAI_API_KEY"],
            ProviderKind::Anthropic => &["ANTHROPIC_API_KEY"],
            ProviderKind::Groq => &["GROQ_API_KEY"],
            ProviderKind::DeepSeek => &["DEEPSEEK_API_KEY"],
            ProviderKind::Mistral => &["MISTRAL_API_KEY"],
            ProviderKind::OpenRouter => &["OPENROUTER_API_KEY"],
            ProviderKind::Nvidia => &["NVIDIA_API_KEY"],
            ProviderKind::Zhipu => &["ZHIPU_API_KEY"],
            ProviderKind::Ollama => &[],
            ProviderKind::Custom => &["CUSTOM_API_KEY"],
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ProviderKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "google" | "gemini" => Ok(ProviderKind::Google),
            "openai" => Ok(ProviderKind::OpenAi),
            "anthropic" | "claude" => Ok(ProviderKind::Anthropic),
            "groq" => Ok(ProviderKind::Groq),
            "deepseek" => Ok(ProviderKind::DeepSeek),
            "mistral" => Ok(ProviderKind::Mistral),
            "openrouter" => Ok(ProviderKind::OpenRouter),
            "nvidia" | "nemotron" => Ok(ProviderKind::Nvidia),
            "zhipu" | "glm" => Ok(ProviderKind::Zhipu),
            "ollama" => Ok(ProviderKind::Ollama),
            "custom" => Ok(ProviderKind::Custom),
            other => Err(DomainError::UnknownProvider(other.to_string())),
        }
    }
}

impl Serialize for ProviderKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ProviderKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_roundtrip() {
        for kind in ProviderKind::ALL {
            let parsed: ProviderKind = kind.as_str().parse().unwrap();
            assert_eq!(kind, parsed);
        }
    }

    #[test]
    fn test_provider_aliases() {
        assert_eq!("Gemini".parse::<ProviderKind>().unwrap(), ProviderKind::Google);
        assert_eq!("GLM".parse::<ProviderKind>().unwrap(), ProviderKind::Zhipu);
        assert!("acme".parse::<ProviderKind>().is_err());
    }

    #[test]
    fn test_protocol_mapping() {
        assert_eq!(ProviderKind::Google.protocol(), ProtocolKind::Gemini);
        assert_eq!(ProviderKind::Anthropic.protocol(), ProtocolKind::Anthropic);
        assert_eq!(ProviderKind::Groq.protocol(), ProtocolKind::OpenAiCompatible);
        assert_eq!(ProviderKind::Ollama.protocol(), ProtocolKind::OpenAiCompatible);
    }

    #[test]
    fn test_local_kinds_need_no_credential() {
        assert!(!ProviderKind::Ollama.requires_credential());
        assert!(!ProviderKind::Custom.requires_credential());
        assert!(ProviderKind::OpenAi.requires_credential());
        assert!(ProviderKind::Ollama.key_env_vars().is_empty());
    }

    #[test]
    fn test_serde_uses_identifier() {
        let json = serde_json::to_string(&ProviderKind::OpenRouter).unwrap();
        assert_eq!(json, "\"openrouter\"");
        let kind: ProviderKind = serde_json::from_str("\"deepseek\"").unwrap();
        assert_eq!(kind, ProviderKind::DeepSeek);
    }
}
