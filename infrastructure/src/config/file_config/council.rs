//! Council roster configuration from TOML (`[council]` section)

use super::{ConfigIssue, Severity};
use council_domain::{Node, NodeRole, ProviderKind};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Raw council configuration.
///
/// Either names a preset or defines members explicitly; explicit members
/// win when both are present.
///
/// # Example
///
/// ```toml
/// [council]
/// preset = "divergence"
/// chairman_id = "chairman-hq"
///
/// [[council.members]]
/// id = "local-critic"
/// name = "Local Critic"
/// provider = "ollama"
/// model = "llama3"
/// base_url = "http://gpu-box:11434/v1"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCouncilConfig {
    /// Built-in roster name
    pub preset: String,
    /// Explicit members, replacing the preset roster when non-empty
    pub members: Vec<FileNodeConfig>,
    /// Explicit chairman, replacing the preset chairman
    pub chairman: Option<FileNodeConfig>,
    /// Promote a member (or the preset chairman) by id
    pub chairman_id: Option<String>,
}

impl Default for FileCouncilConfig {
    fn default() -> Self {
        Self {
            preset: "standard".to_string(),
            members: Vec::new(),
            chairman: None,
            chairman_id: None,
        }
    }
}

/// One node definition.
///
/// `provider` stays a string so that an unknown name is reported by
/// validation instead of failing the whole load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileNodeConfig {
    pub id: String,
    pub name: String,
    pub provider: String,
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
}

impl FileNodeConfig {
    /// Convert to a domain node, or `None` when the provider is unknown.
    pub fn to_node(&self, role: NodeRole) -> Option<Node> {
        let provider: ProviderKind = self.provider.parse().ok()?;
        let name = if self.name.trim().is_empty() {
            self.id.clone()
        } else {
            self.name.clone()
        };
        let mut node = Node::new(self.id.trim(), name, provider, self.model.trim())
            .with_role(role)
            .with_description(self.description.clone());
        if let Some(url) = &self.base_url {
            node = node.with_base_url(url.clone());
        }
        if let Some(prompt) = &self.system_prompt {
            node = node.with_system_prompt(prompt.clone());
        }
        Some(node)
    }

    fn validate(&self, field: &str, issues: &mut Vec<ConfigIssue>) {
        if self.id.trim().is_empty() {
            issues.push(ConfigIssue::error(field, "node id cannot be empty"));
        }
        if let Err(e) = self.provider.parse::<ProviderKind>() {
            issues.push(ConfigIssue::error(field, e.to_string()));
        }
        if self.model.trim().is_empty() {
            issues.push(ConfigIssue::error(
                field,
                format!("node '{}' has an empty model id", self.id),
            ));
        }
    }
}

impl FileCouncilConfig {
    pub(super) fn validate(&self, issues: &mut Vec<ConfigIssue>) {
        if self.members.is_empty() && council_domain::Preset::by_name(&self.preset).is_err() {
            issues.push(ConfigIssue::error(
                "council.preset",
                format!("unknown preset '{}'", self.preset),
            ));
        }

        let mut seen = HashSet::new();
        for (i, member) in self.members.iter().enumerate() {
            let field = format!("council.members[{}]", i);
            member.validate(&field, issues);
            if !member.id.trim().is_empty() && !seen.insert(member.id.trim()) {
                issues.push(ConfigIssue::error(
                    &field,
                    format!("duplicate node id '{}'", member.id),
                ));
            }
        }

        if let Some(chairman) = &self.chairman {
            chairman.validate("council.chairman", issues);
        }

        if let Some(id) = &self.chairman_id {
            let preset_ids: Vec<String> = council_domain::Preset::by_name(&self.preset)
                .map(|p| {
                    p.members
                        .iter()
                        .chain(std::iter::once(&p.chairman))
                        .map(|n| n.id.to_string())
                        .collect()
                })
                .unwrap_or_default();
            let known = self.members.iter().any(|m| m.id.trim() == id.trim())
                || self.chairman.as_ref().is_some_and(|c| c.id.trim() == id.trim())
                || (self.members.is_empty() && preset_ids.iter().any(|p| p == id.trim()));
            if !known {
                issues.push(ConfigIssue {
                    severity: Severity::Warning,
                    field: "council.chairman_id".to_string(),
                    message: format!(
                        "chairman id '{}' matches no node, using the default chairman",
                        id
                    ),
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(id: &str, provider: &str, model: &str) -> FileNodeConfig {
        FileNodeConfig {
            id: id.to_string(),
            name: format!("Node {}", id),
            provider: provider.to_string(),
            model: model.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_to_node() {
        let mut cfg = member("local", "ollama", "llama3");
        cfg.base_url = Some("http://gpu-box:11434/v1".to_string());
        cfg.system_prompt = Some("Be blunt.".to_string());
        let node = cfg.to_node(NodeRole::Member).unwrap();
        assert_eq!(node.provider, ProviderKind::Ollama);
        assert_eq!(node.endpoint(), "http://gpu-box:11434/v1");
        assert_eq!(node.role_instruction(), Some("Be blunt."));

        assert!(member("x", "acme", "m").to_node(NodeRole::Member).is_none());
    }

    #[test]
    fn test_validate_reports_every_problem() {
        let config = FileCouncilConfig {
            members: vec![
                member("a", "openai", "gpt-4o"),
                member("a", "groq", "llama3"),
                member("b", "acme", "m"),
                member("c", "mistral", "  "),
            ],
            chairman_id: Some("nobody".to_string()),
            ..Default::default()
        };
        let mut issues = Vec::new();
        config.validate(&mut issues);

        let messages: Vec<&str> = issues.iter().map(|i| i.message.as_str()).collect();
        assert!(messages.iter().any(|m| m.contains("duplicate node id 'a'")));
        assert!(messages.iter().any(|m| m.contains("Unknown provider: acme")));
        assert!(messages.iter().any(|m| m.contains("empty model id")));
        let chair = issues.iter().find(|i| i.field == "council.chairman_id").unwrap();
        assert_eq!(chair.severity, Severity::Warning);
    }

    #[test]
    fn test_chairman_id_may_name_preset_node() {
        let config = FileCouncilConfig {
            chairman_id: Some("node-beta-logic".to_string()),
            ..Default::default()
        };
        let mut issues = Vec::new();
        config.validate(&mut issues);
        assert!(issues.is_empty());
    }

    #[test]
    fn test_unknown_preset() {
        let config = FileCouncilConfig {
            preset: "galaxy-brain".to_string(),
            ..Default::default()
        };
        let mut issues = Vec::new();
        config.validate(&mut issues);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Error);
    }
}
