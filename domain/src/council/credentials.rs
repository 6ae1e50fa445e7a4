//! Active credential set.

use super::node::Node;
use super::provider::ProviderKind;
use std::collections::HashMap;

/// Per-provider credential strings (Value Object)
///
/// Blank strings are treated as absent. The set is a snapshot taken once per
/// orchestration run.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct CredentialSet {
    keys: HashMap<ProviderKind, String>,
}

impl CredentialSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_key(mut self, kind: ProviderKind, key: impl Into<String>) -> Self {
        self.insert(kind, key);
        self
    }

    pub fn insert(&mut self, kind: ProviderKind, key: impl Into<String>) {
        let key = key.into();
        if key.trim().is_empty() {
            self.keys.remove(&kind);
        } else {
            self.keys.insert(kind, key.trim().to_string());
        }
    }

    /// The non-empty credential for a provider, if any.
    pub fn get(&self, kind: ProviderKind) -> Option<&str> {
        self.keys.get(&kind).map(String::as_str)
    }

    pub fn has_key(&self, kind: ProviderKind) -> bool {
        self.get(kind).is_some()
    }

    /// Whether a node can be called with this credential set.
    ///
    /// True iff the provider has a non-empty key, or the provider is a
    /// self-hosted kind that needs none.
    pub fn is_ready(&self, node: &Node) -> bool {
        !node.provider.requires_credential() || self.has_key(node.provider)
    }

    /// Providers that currently have a key, in catalogue order.
    pub fn configured_providers(&self) -> Vec<ProviderKind> {
        ProviderKind::ALL
            .into_iter()
            .filter(|k| self.has_key(*k))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl std::fmt::Debug for CredentialSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print the key material itself.
        f.debug_struct("CredentialSet")
            .field("providers", &self.configured_providers())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_key_is_absent() {
        let creds = CredentialSet::new().with_key(ProviderKind::OpenAi, "   ");
        assert!(!creds.has_key(ProviderKind::OpenAi));
        assert!(creds.is_empty());
    }

    #[test]
    fn test_key_is_trimmed() {
        let creds = CredentialSet::new().with_key(ProviderKind::Groq, " gsk_123 \n");
        assert_eq!(creds.get(ProviderKind::Groq), Some("gsk_123"));
    }

    #[test]
    fn test_readiness_by_declaration_for_local_kinds() {
        let creds = CredentialSet::new();
        let ollama = Node::new("o", "Local", ProviderKind::Ollama, "llama3");
        let openai = Node::new("g", "GPT", ProviderKind::OpenAi, "gpt-4o");
        assert!(creds.is_ready(&ollama));
        assert!(!creds.is_ready(&openai));
    }

    #[test]
    fn test_debug_hides_keys() {
        let creds = CredentialSet::new().with_key(ProviderKind::Anthropic, "sk-ant-secret");
        let printed = format!("{:?}", creds);
        assert!(!printed.contains("secret"));
        assert!(printed.contains("Anthropic"));
    }
}
