//! Prompt templates for the council flow

use crate::context::ContextBudget;
use crate::council::node::Node;
use crate::debate::message::DebateMessage;
use crate::orchestration::value_objects::{CouncilResponse, PeerReview};

/// Label used for the human participant in synthesis context.
const SYNTHESIS_USER_LABEL: &str = "User";

/// Templates for generating prompts at each stage
pub struct PromptTemplate;

impl PromptTemplate {
    /// System instruction for a round node that has none configured.
    pub fn council_member_system(query: &str, role: Option<&str>) -> String {
        let role = role
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .unwrap_or("Standard investigative logic.");
        format!(
            r#"ROLE: Council analysis node.
OBJECTIVE: Analyze the following directive independently.
ROLE_CONTEXT: {}

IMPORTANT: Detect the language of the DIRECTIVE. Your entire response MUST be in that same language.

DIRECTIVE: {}"#,
            role, query
        )
    }

    /// System instruction for a round call: the node's own instruction wins.
    pub fn round_system(node: &Node, query: &str) -> String {
        match node.role_instruction() {
            Some(instruction) => instruction.to_string(),
            None => Self::council_member_system(query, Some(&node.description)),
        }
    }

    /// System prompt for peer review phase
    pub fn review_system() -> &'static str {
        "Analyze logical consistency."
    }

    /// User prompt asking `reviewer` to critique one peer's round response.
    pub fn review_prompt(
        query: &str,
        target_name: &str,
        target_content: &str,
        budget: &ContextBudget,
    ) -> String {
        format!(
            r#"ROLE: Peer reviewer.
QUERY_CONTEXT: "{}"
TARGET_NODE: {}
TARGET_OUTPUT: "{}"

IMPORTANT: Detect the language of the QUERY_CONTEXT. Your entire response MUST be in that same language.

TASK: Critique logical consistency and assign a score (1-10).
FORMAT:
Critique: [Analysis]
Score: [Value]"#,
            query,
            target_name,
            budget.synthesis_entry(target_content)
        )
    }

    /// Chairman prompt wrapping the consolidated context.
    pub fn chairman_prompt(query: &str, context: &str) -> String {
        format!(
            r#"ROLE: Council chairman.
QUERY: "{}"

IMPORTANT: Detect the language of the QUERY. Your entire response MUST be in that same language.

{}

TASK: Construct a FINAL CONSOLIDATED VERDICT. Focus on high-confidence insights and actionable conclusions."#,
            query, context
        )
    }

    /// Build the chairman's context: healthy round findings, optional peer
    /// reviews, then the full debate transcript in commit order.
    ///
    /// Every entry is clipped to the budget's synthesis entry size.
    pub fn synthesis_context(
        roster: &[Node],
        responses: &[CouncilResponse],
        reviews: &[PeerReview],
        transcript: &[DebateMessage],
        budget: &ContextBudget,
    ) -> String {
        let mut context = String::from("--- COUNCIL FINDINGS ---\n");
        for response in responses.iter().filter(|r| !r.is_degraded()) {
            context.push_str(&format!(
                "\n[{}]: {}\n",
                node_name(roster, response.node_id.as_str()),
                budget.synthesis_entry(&response.content)
            ));
        }

        if !reviews.is_empty() {
            context.push_str("\n--- PEER REVIEWS ---\n");
            for review in reviews {
                context.push_str(&format!(
                    "\n[{} reviewing {}]: {}\n",
                    node_name(roster, review.reviewer_id.as_str()),
                    node_name(roster, review.target_id.as_str()),
                    budget.synthesis_entry(&review.content)
                ));
            }
        }

        if !transcript.is_empty() {
            context.push_str("\n--- DEBATE TRANSCRIPT ---\n");
            for message in transcript {
                context.push_str(&format!(
                    "\n[{}]: {}\n",
                    message.speaker.display_name(roster, SYNTHESIS_USER_LABEL),
                    budget.synthesis_entry(&message.content)
                ));
            }
        }

        context
    }
}

/// Roster name for a node id, falling back to the id itself.
pub(crate) fn node_name<'a>(roster: &'a [Node], id: &'a str) -> &'a str {
    roster
        .iter()
        .find(|n| n.id.as_str() == id)
        .map(|n| n.name.as_str())
        .unwrap_or(id)
}
