//! Per-turn debate prompt.
//!
//! A turn prompt quotes the query, a clipped stance preview for each node's
//! round position, and a trailing window of clipped transcript messages. Its
//! size is therefore bounded by the [`ContextBudget`] regardless of how long
//! the debate has run.

use super::template::node_name;
use crate::context::ContextBudget;
use crate::council::node::Node;
use crate::debate::message::DebateMessage;
use crate::debate::moves::RhetoricalMove;
use crate::debate::register::UserRegister;
use crate::orchestration::value_objects::CouncilResponse;

/// Label used for the human participant inside debate prompts.
const DEBATE_USER_LABEL: &str = "USER";

/// Prompt and system instruction for a single debate turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebateTurnPrompt {
    pub prompt: String,
    pub system: String,
    pub register: UserRegister,
    pub suggested_move: RhetoricalMove,
    pub user_just_spoke: bool,
}

impl DebateTurnPrompt {
    /// Build the prompt for `speaker`'s turn number `turn_index`.
    pub fn build(
        query: &str,
        speaker: &Node,
        roster: &[Node],
        stances: &[CouncilResponse],
        transcript: &[DebateMessage],
        turn_index: usize,
        budget: &ContextBudget,
    ) -> Self {
        let window = budget.window(transcript);
        let user_just_spoke = window.last().is_some_and(|m| m.speaker.is_user());
        let register = UserRegister::detect(transcript);
        let suggested_move = RhetoricalMove::for_turn(turn_index);

        Self {
            prompt: Self::render_context(query, roster, stances, window, budget),
            system: Self::render_system(speaker, register, suggested_move, user_just_spoke),
            register,
            suggested_move,
            user_just_spoke,
        }
    }

    fn render_context(
        query: &str,
        roster: &[Node],
        stances: &[CouncilResponse],
        window: &[DebateMessage],
        budget: &ContextBudget,
    ) -> String {
        let mut context = format!("ORIGINAL QUESTION: \"{}\"\n\n", query);
        context.push_str("=== NODE STANCES (brief) ===\n");
        for stance in stances.iter().filter(|s| !s.is_degraded()) {
            let preview = budget.stance_preview(&stance.content);
            let ellipsis = if preview.chars().count() < stance.content.chars().count() {
                "..."
            } else {
                ""
            };
            context.push_str(&format!(
                "[{}]: {}{}\n",
                node_name(roster, stance.node_id.as_str()),
                preview,
                ellipsis
            ));
        }

        if !window.is_empty() {
            context.push_str("\n=== DEBATE (recent) ===\n");
            for message in window {
                context.push_str(&format!(
                    "[{}]: {}\n",
                    message.speaker.display_name(roster, DEBATE_USER_LABEL),
                    budget.snippet(&message.content)
                ));
            }
        }

        context
    }

    fn render_system(
        speaker: &Node,
        register: UserRegister,
        suggested_move: RhetoricalMove,
        user_just_spoke: bool,
    ) -> String {
        let persona = speaker
            .role_instruction()
            .unwrap_or(speaker.description.as_str());

        let mut system = format!("You are {}. {}\n\n", speaker.name, persona);
        system.push_str(
            "You are live in a spoken debate. Real people are watching or listening. \
             This is performance as much as it is reasoning.\n\n",
        );
        system.push_str("=== DEBATE RULES ===\n");
        system.push_str("1. Speak as if you are talking, not writing. Use natural spoken rhythms.\n");
        system.push_str(
            "2. React to what was JUST said. Don't repeat old points: respond, challenge, or pivot.\n",
        );
        system.push_str("3. Keep your turn to 2-4 sentences MAX. Punchy. Vivid. Memorable.\n");
        system.push_str(
            "4. Use one of these moves per turn and never the same move twice in a row:\n",
        );
        for m in RhetoricalMove::ALL {
            system.push_str(&format!("   - {}: {}\n", m.label(), m.guidance()));
        }
        system.push_str(&format!(
            "   Suggested move this turn: {}.\n",
            suggested_move.label()
        ));
        system.push_str(
            "5. If the USER just spoke, respond TO THEM FIRST and take their point seriously.\n",
        );
        system.push_str(&format!(
            "6. NEVER start with \"{}:\". Just start speaking.\n",
            speaker.name
        ));
        system.push_str(&format!(
            "7. Vocabulary (detected user level: {}):\n",
            register.as_str()
        ));
        system.push_str("   - general: clear, plain language, relatable analogies. No jargon.\n");
        system.push_str("   - informed: technical terms are fine, but explain quickly.\n");
        system.push_str("   - expert: full depth, precision, no hand-holding.\n");
        system.push_str(
            "8. Match the topic's weight: playful topics can be bold and theatrical, \
             serious ones measured and precise.\n",
        );
        system.push_str(
            "9. Do NOT use markdown headers, bullet points, or bold text. Speak in plain sentences.\n",
        );
        if user_just_spoke {
            system.push_str("\nTHE USER JUST SPOKE. Address them directly in your opening line.\n");
        }
        system
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::council::node::NodeId;
    use crate::council::provider::ProviderKind;
    use crate::debate::message::MessageId;

    fn roster() -> Vec<Node> {
        vec![
            Node::new("a", "Alpha", ProviderKind::Google, "m").with_system_prompt("Stick to facts."),
            Node::new("b", "Beta", ProviderKind::Groq, "m").with_description("Contrarian."),
        ]
    }

    fn transcript(len: usize, body: &str) -> Vec<DebateMessage> {
        (0..len)
            .map(|i| {
                let id = if i % 2 == 0 { "a" } else { "b" };
                DebateMessage::from_node(MessageId(i as u64), &NodeId::new(id), format!("{i} {body}"))
            })
            .collect()
    }

    #[test]
    fn test_prompt_size_is_independent_of_transcript_length() {
        let nodes = roster();
        let stances = vec![
            CouncilResponse::success(NodeId::new("a"), "s".repeat(5_000)),
            CouncilResponse::success(NodeId::new("b"), "t".repeat(5_000)),
        ];
        let budget = ContextBudget::default();
        let body = "word ".repeat(400);

        let short = transcript(10, &body);
        let long = transcript(1_000, &body);
        let p_short = DebateTurnPrompt::build("q", &nodes[0], &nodes, &stances, &short, 10, &budget);
        let p_long = DebateTurnPrompt::build("q", &nodes[0], &nodes, &stances, &long, 1_000, &budget);

        let debate_lines = |p: &str| {
            p.split("=== DEBATE (recent) ===\n")
                .nth(1)
                .map(|s| s.lines().count())
                .unwrap_or(0)
        };
        assert_eq!(debate_lines(&p_long.prompt), budget.transcript_window());
        for line in p_long.prompt.lines() {
            let content = line.split_once("]: ").map(|(_, c)| c).unwrap_or("");
            assert!(content.trim_end_matches("...").chars().count() <= budget.stance_preview_chars());
        }

        // Everything quoted fits inside the budget plus per-line framing.
        let framing = 200 + 16 * (stances.len() + budget.transcript_window());
        assert!(
            p_long.prompt.chars().count()
                <= budget.max_quoted_chars(stances.len()) + framing
        );
        // Only digits in the message prefix differ between the two windows.
        let diff = p_long.prompt.chars().count() as i64 - p_short.prompt.chars().count() as i64;
        assert!(diff.abs() <= 3 * budget.transcript_window() as i64);
    }

    #[test]
    fn test_window_is_most_recent_messages() {
        let nodes = roster();
        let msgs = transcript(20, "x");
        let p = DebateTurnPrompt::build("q", &nodes[1], &nodes, &[], &msgs, 20, &ContextBudget::default());
        assert!(p.prompt.contains("[Alpha]: 14 x"));
        assert!(p.prompt.contains("[Beta]: 19 x"));
        assert!(!p.prompt.contains("[Beta]: 13 x"));
    }

    #[test]
    fn test_user_just_spoke_flag() {
        let nodes = roster();
        let mut msgs = transcript(2, "x");
        msgs.push(DebateMessage::from_user(MessageId(2), "What about cost?"));
        let p = DebateTurnPrompt::build("q", &nodes[0], &nodes, &[], &msgs, 2, &ContextBudget::default());
        assert!(p.user_just_spoke);
        assert!(p.system.contains("THE USER JUST SPOKE"));
        assert!(p.prompt.contains("[USER]: What about cost?"));

        let p = DebateTurnPrompt::build("q", &nodes[0], &nodes, &[], &msgs[..2], 2, &ContextBudget::default());
        assert!(!p.user_just_spoke);
        assert!(!p.system.contains("THE USER JUST SPOKE"));
    }

    #[test]
    fn test_system_carries_persona_and_register() {
        let nodes = roster();
        let msgs = vec![DebateMessage::from_user(MessageId(0), "word ".repeat(50))];
        let p = DebateTurnPrompt::build("q", &nodes[0], &nodes, &[], &msgs, 0, &ContextBudget::default());
        assert!(p.system.starts_with("You are Alpha. Stick to facts."));
        assert_eq!(p.register, UserRegister::Expert);
        assert!(p.system.contains("detected user level: expert"));

        let p = DebateTurnPrompt::build("q", &nodes[1], &nodes, &[], &[], 1, &ContextBudget::default());
        assert!(p.system.starts_with("You are Beta. Contrarian."));
        assert_eq!(p.register, UserRegister::General);
        assert_eq!(p.suggested_move, RhetoricalMove::for_turn(1));
    }

    #[test]
    fn test_degraded_stances_are_omitted() {
        let nodes = roster();
        let stances = vec![
            CouncilResponse::success(NodeId::new("a"), "short stance"),
            CouncilResponse::unauthorized(NodeId::new("b"), "Beta"),
        ];
        let p = DebateTurnPrompt::build("q", &nodes[0], &nodes, &stances, &[], 0, &ContextBudget::default());
        assert!(p.prompt.contains("[Alpha]: short stance\n"));
        assert!(!p.prompt.contains("Unauthorized"));
    }
}
