//! Resolved configuration snapshot.

use super::file_config::{FileConfig, FileNodeConfig};
use council_application::{CouncilPolicy, DebatePolicy};
use council_domain::{
    CredentialSet, DomainError, DurationPolicy, Node, NodeRole, OutputFormat, Preset,
};
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors resolving a [`FileConfig`] into [`CouncilSettings`]
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Council has no usable members")]
    NoMembers,
}

/// Immutable configuration for one orchestration run.
#[derive(Debug, Clone)]
pub struct CouncilSettings {
    pub roster: Vec<Node>,
    pub chairman: Node,
    pub credentials: CredentialSet,
    pub council_policy: CouncilPolicy,
    pub debate_policy: DebatePolicy,
    pub debate_enabled: bool,
    pub debate_duration: DurationPolicy,
    pub output_format: Option<OutputFormat>,
    pub color: bool,
    pub conversation_log: Option<PathBuf>,
    pub log_dir: Option<PathBuf>,
}

impl CouncilSettings {
    /// Resolve with credentials falling back to the process environment.
    pub fn resolve(config: &FileConfig) -> Result<Self, ConfigError> {
        Self::resolve_with(config, config.credentials.to_credential_set())
    }

    /// Resolve with an explicit credential set.
    ///
    /// Invalid member entries are skipped with a warning; `validate()`
    /// reports them in detail.
    pub fn resolve_with(
        config: &FileConfig,
        credentials: CredentialSet,
    ) -> Result<Self, ConfigError> {
        let council = &config.council;
        let (mut roster, mut chairman) = if council.members.is_empty() {
            let preset = Preset::by_name(&council.preset)?;
            debug!("Using preset roster '{}'", preset.name);
            (preset.members, preset.chairman)
        } else {
            let preset_chairman = Preset::standard().chairman;
            (to_nodes(&council.members), preset_chairman)
        };

        if roster.is_empty() {
            return Err(ConfigError::NoMembers);
        }

        if let Some(explicit) = council.chairman.as_ref().and_then(|c| to_node(c, NodeRole::Chairman)) {
            chairman = explicit;
        }

        if let Some(id) = council.chairman_id.as_deref().map(str::trim) {
            if let Some(member) = roster.iter().find(|n| n.id.as_str() == id) {
                chairman = member.clone().with_role(NodeRole::Chairman);
            } else if chairman.id.as_str() != id {
                warn!("Chairman id '{}' matches no node, keeping {}", id, chairman.id);
            }
        }

        for node in &mut roster {
            node.role = NodeRole::Member;
        }

        let (budget, _) = config.context_budget.to_context_budget();

        Ok(Self {
            roster,
            chairman,
            credentials,
            council_policy: config.round.to_policy().with_budget(budget),
            debate_policy: config.debate.to_policy().with_budget(budget),
            debate_enabled: config.debate.enabled,
            debate_duration: config.debate.duration(),
            output_format: config.output.format,
            color: config.output.color,
            conversation_log: config.logging.conversation_log.clone(),
            log_dir: config.logging.log_dir.clone(),
        })
    }
}

fn to_node(config: &FileNodeConfig, role: NodeRole) -> Option<Node> {
    let node = config.to_node(role)?;
    match node.validate() {
        Ok(()) => Some(node),
        Err(e) => {
            warn!("Ignoring node '{}': {}", config.id, e);
            None
        }
    }
}

fn to_nodes(members: &[FileNodeConfig]) -> Vec<Node> {
    let mut nodes: Vec<Node> = Vec::with_capacity(members.len());
    for member in members {
        let Some(node) = to_node(member, NodeRole::Member) else {
            warn!("Ignoring node '{}' with provider '{}'", member.id, member.provider);
            continue;
        };
        if nodes.iter().any(|n| n.id == node.id) {
            warn!("Ignoring duplicate node id '{}'", node.id);
            continue;
        }
        nodes.push(node);
    }
    nodes
}

#[cfg(test)]
mod tests {
    use super::*;
    use council_domain::ProviderKind;

    fn member(id: &str, provider: &str) -> FileNodeConfig {
        FileNodeConfig {
            id: id.to_string(),
            name: id.to_uppercase(),
            provider: provider.to_string(),
            model: "m".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_default_resolves_standard_preset() {
        let settings =
            CouncilSettings::resolve_with(&FileConfig::default(), CredentialSet::new()).unwrap();
        assert_eq!(settings.roster.len(), 3);
        assert_eq!(settings.chairman.id.as_str(), "chairman-hq");
        assert!(settings.chairman.is_chairman());
        assert_eq!(settings.debate_duration, DurationPolicy::Fixed(300));
        assert_eq!(settings.council_policy, CouncilPolicy::default());
    }

    #[test]
    fn test_explicit_members_skip_invalid_and_duplicates() {
        let mut config = FileConfig::default();
        config.council.members = vec![
            member("a", "openai"),
            member("a", "groq"),
            member("b", "acme"),
            member("c", "ollama"),
        ];
        let settings = CouncilSettings::resolve_with(&config, CredentialSet::new()).unwrap();
        let ids: Vec<&str> = settings.roster.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
        assert_eq!(settings.roster[0].provider, ProviderKind::OpenAi);
    }

    #[test]
    fn test_chairman_id_promotes_member() {
        let mut config = FileConfig::default();
        config.council.members = vec![member("a", "openai"), member("b", "anthropic")];
        config.council.chairman_id = Some("b".to_string());
        let settings = CouncilSettings::resolve_with(&config, CredentialSet::new()).unwrap();
        assert_eq!(settings.chairman.id.as_str(), "b");
        assert!(settings.chairman.is_chairman());
        assert!(settings.roster.iter().all(|n| !n.is_chairman()));
    }

    #[test]
    fn test_all_members_invalid_is_error() {
        let mut config = FileConfig::default();
        config.council.members = vec![member("x", "acme")];
        assert!(matches!(
            CouncilSettings::resolve_with(&config, CredentialSet::new()),
            Err(ConfigError::NoMembers)
        ));
    }

    #[test]
    fn test_unknown_preset_is_error() {
        let mut config = FileConfig::default();
        config.council.preset = "galaxy-brain".to_string();
        assert!(matches!(
            CouncilSettings::resolve_with(&config, CredentialSet::new()),
            Err(ConfigError::Domain(DomainError::UnknownPreset(_)))
        ));
    }

    #[test]
    fn test_budget_flows_into_policies() {
        let mut config = FileConfig::default();
        config.context_budget.synthesis_entry_chars = 1000;
        config.round.review = true;
        let settings = CouncilSettings::resolve_with(&config, CredentialSet::new()).unwrap();
        assert_eq!(settings.council_policy.budget.synthesis_entry_chars(), 1000);
        assert_eq!(settings.debate_policy.budget.synthesis_entry_chars(), 1000);
        assert!(settings.council_policy.enable_review);
    }
}
