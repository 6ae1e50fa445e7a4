//! Built-in council rosters.

use super::node::{Node, NodeRole};
use super::provider::ProviderKind;
use crate::core::error::DomainError;

/// A named roster with its chairman
#[derive(Debug, Clone)]
pub struct Preset {
    pub name: &'static str,
    pub description: &'static str,
    pub members: Vec<Node>,
    pub chairman: Node,
}

impl Preset {
    /// Three Gemini analyst nodes with complementary roles.
    pub fn standard() -> Self {
        Self {
            name: "standard",
            description: "Default secure consensus using three distinct, high-performance logic nodes.",
            members: default_council(),
            chairman: default_chairman(),
        }
    }

    /// The standard roster plus external providers for broader diversity.
    pub fn divergence() -> Self {
        let mut members = default_council();
        members.push(
            Node::new("ext_1", "Critic (Llama)", ProviderKind::Groq, "llama3-70b-8192")
                .with_description("Hard-line critical review node.")
                .with_system_prompt("Be extremely critical."),
        );
        members.push(
            Node::new(
                "ext_2",
                "Creative (Claude)",
                ProviderKind::Anthropic,
                "claude-3-5-sonnet-20240620",
            )
            .with_description("Nuanced semantic analysis.")
            .with_system_prompt("Focus on semantic nuance."),
        );
        Self {
            name: "divergence",
            description: "Adds external model providers to the council for broader logical diversity. Requires additional keys.",
            members,
            chairman: default_chairman(),
        }
    }

    pub fn all() -> Vec<Preset> {
        vec![Self::standard(), Self::divergence()]
    }

    pub fn by_name(name: &str) -> Result<Preset, DomainError> {
        match name.trim().to_lowercase().as_str() {
            "standard" | "" => Ok(Self::standard()),
            "divergence" | "enhanced" => Ok(Self::divergence()),
            other => Err(DomainError::UnknownPreset(other.to_string())),
        }
    }
}

/// The default three-node council.
pub fn default_council() -> Vec<Node> {
    vec![
        Node::new(
            "node-alpha-fact",
            "Analyst Alpha",
            ProviderKind::Google,
            "gemini-3-flash-preview",
        )
        .with_description("Specialized in factual verification and logical auditing.")
        .with_system_prompt(
            "You are Analyst Alpha. Your role is strictly factual. Identify any empirical errors or logical fallacies in the user's directive. Be precise and brief.",
        ),
        Node::new(
            "node-beta-logic",
            "Logic Specialist",
            ProviderKind::Google,
            "gemini-3-pro-preview",
        )
        .with_description("Focused on structural reasoning and step-by-step analysis.")
        .with_system_prompt(
            "You are the Logic Specialist. Deconstruct the user directive and propose a structurally sound methodology. Focus on reasoning depth.",
        ),
        Node::new(
            "node-gamma-vision",
            "Strategic Visionary",
            ProviderKind::Google,
            "gemini-3-pro-preview",
        )
        .with_description("Explores creative synthesis and alternative perspectives.")
        .with_system_prompt(
            "You are the Strategic Visionary. Look for implications, edge cases, and creative opportunities within the directive. Offer unconventional but high-impact insights.",
        ),
    ]
}

/// The default chairman.
pub fn default_chairman() -> Node {
    Node::new(
        "chairman-hq",
        "Protocol Chairman",
        ProviderKind::Google,
        "gemini-3-pro-preview",
    )
    .with_role(NodeRole::Chairman)
    .with_description("The primary authority for synthesizing autonomous consensus.")
    .with_system_prompt(
        "You are the Protocol Chairman. Your objective is to synthesize the council's disparate findings into a single, cohesive, and authoritative verdict. Filter noise and prioritize consensus points.",
    )
}
