//! Credential configuration from TOML (`[credentials]` section)

use council_domain::{CredentialSet, ProviderKind};
use serde::{Deserialize, Serialize};

/// One optional key per provider.
///
/// Keys missing here fall back to the provider's well-known environment
/// variables (`OPENAI_API_KEY`, `GEMINI_API_KEY`, ...).
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCredentialsConfig {
    pub google: Option<String>,
    pub openai: Option<String>,
    pub anthropic: Option<String>,
    pub groq: Option<String>,
    pub deepseek: Option<String>,
    pub mistral: Option<String>,
    pub openrouter: Option<String>,
    pub nvidia: Option<String>,
    pub zhipu: Option<String>,
    pub ollama: Option<String>,
    pub custom: Option<String>,
}

impl FileCredentialsConfig {
    pub fn get(&self, kind: ProviderKind) -> Option<&str> {
        let key = match kind {
            ProviderKind::Google => &self.google,
            ProviderKind::OpenAi => &self.openai,
            ProviderKind::Anthropic => &self.anthropic,
            ProviderKind::Groq => &self.groq,
            ProviderKind::DeepSeek => &self.deepseek,
            ProviderKind::Mistral => &self.mistral,
            ProviderKind::OpenRouter => &self.openrouter,
            ProviderKind::Nvidia => &self.nvidia,
            ProviderKind::Zhipu => &self.zhipu,
            ProviderKind::Ollama => &self.ollama,
            ProviderKind::Custom => &self.custom,
        };
        key.as_deref().filter(|k| !k.trim().is_empty())
    }

    /// Build the credential set, consulting the process environment for
    /// keys the file leaves out.
    pub fn to_credential_set(&self) -> CredentialSet {
        self.to_credential_set_with(|var| std::env::var(var).ok())
    }

    /// Build the credential set with an explicit environment lookup.
    pub fn to_credential_set_with<F>(&self, env: F) -> CredentialSet
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut set = CredentialSet::new();
        for kind in ProviderKind::ALL {
            let key = self.get(kind).map(str::to_string).or_else(|| {
                kind.key_env_vars()
                    .iter()
                    .filter_map(|var| env(var))
                    .find(|v| !v.trim().is_empty())
            });
            if let Some(key) = key {
                set.insert(kind, key);
            }
        }
        set
    }
}

impl std::fmt::Debug for FileCredentialsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let configured: Vec<&str> = ProviderKind::ALL
            .into_iter()
            .filter(|k| self.get(*k).is_some())
            .map(|k| k.as_str())
            .collect();
        f.debug_struct("FileCredentialsConfig")
            .field("configured", &configured)
            .finish()
    }
}
