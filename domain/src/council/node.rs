//! Node entity: one configured LLM backend in the council.

use super::provider::ProviderKind;
use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Opaque node identity (Value Object)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Position of a node in the council
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeRole {
    #[default]
    Member,
    Chairman,
}

/// A configured council participant (Entity)
///
/// Nodes are immutable for the duration of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub name: String,
    #[serde(default)]
    pub role: NodeRole,
    pub provider: ProviderKind,
    /// Provider-side model identifier
    pub model_id: String,
    /// Custom endpoint overriding the provider's default base URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Short role hint embedded into generated instructions
    #[serde(default)]
    pub description: String,
    /// Configured role/system instruction, used verbatim when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
}

impl Node {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        provider: ProviderKind,
        model_id: impl Into<String>,
    ) -> Self {
        Self {
            id: NodeId::new(id),
            name: name.into(),
            role: NodeRole::Member,
            provider,
            model_id: model_id.into(),
            base_url: None,
            description: String::new(),
            system_prompt: None,
        }
    }

    pub fn with_role(mut self, role: NodeRole) -> Self {
        self.role = role;
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    /// Effective API base URL, without a trailing slash.
    pub fn endpoint(&self) -> String {
        let url = match &self.base_url {
            Some(url) if self.provider.allows_custom_endpoint() && !url.trim().is_empty() => {
                url.trim()
            }
            _ => self.provider.default_base_url(),
        };
        url.trim_end_matches('/').to_string()
    }

    /// The configured system instruction, if non-empty.
    pub fn role_instruction(&self) -> Option<&str> {
        self.system_prompt
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    pub fn is_chairman(&self) -> bool {
        self.role == NodeRole::Chairman
    }

    /// Check structural validity (non-empty id, name and model).
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.id.as_str().trim().is_empty() {
            return Err(DomainError::InvalidNode("node id cannot be empty".to_string()));
        }
        if self.name.trim().is_empty() {
            return Err(DomainError::InvalidNode(format!(
                "node '{}' has an empty name",
                self.id
            )));
        }
        if self.model_id.trim().is_empty() {
            return Err(DomainError::InvalidNode(format!(
                "node '{}' has an empty model id",
                self.id
            )));
        }
        Ok(())
    }
}
