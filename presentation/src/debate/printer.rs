//! Renders debate events to the terminal.

use crate::output::console::ConsoleFormatter;
use colored::Colorize;
use council_application::DebateEvent;
use council_domain::{DebateMessage, DurationPolicy, Node, NodeId, Speaker};
use tokio::sync::mpsc;

/// Prints debate events as they arrive
pub struct DebatePrinter {
    roster: Vec<Node>,
}

impl DebatePrinter {
    pub fn new(roster: Vec<Node>) -> Self {
        Self { roster }
    }

    /// Print events until the debate ends; returns the final transcript.
    pub async fn run(&self, mut events: mpsc::UnboundedReceiver<DebateEvent>) -> Vec<DebateMessage> {
        while let Some(event) = events.recv().await {
            if let Some(line) = self.format_event(&event) {
                println!("{}", line);
            }
            if let DebateEvent::Ended { transcript } = event {
                return transcript;
            }
        }
        Vec::new()
    }

    /// The line to print for an event, if any.
    ///
    /// The operator's own messages are not echoed; countdown ticks are
    /// shown on whole minutes and over the last ten seconds.
    pub fn format_event(&self, event: &DebateEvent) -> Option<String> {
        match event {
            DebateEvent::Started { policy } => {
                let length = match policy {
                    DurationPolicy::Fixed(_) => format!("{} on the clock", policy),
                    DurationPolicy::Unlimited => "no time limit".to_string(),
                };
                Some(format!(
                    "\n{} ({})\n{}",
                    "── Live Debate ──".cyan().bold(),
                    length,
                    crate::debate::DebateCommand::help().dimmed()
                ))
            }
            DebateEvent::TurnStarted { .. } => None,
            DebateEvent::MessageAppended(message) => match message.speaker {
                Speaker::User => None,
                Speaker::Node(_) => Some(ConsoleFormatter::format_message(message, &self.roster)),
            },
            DebateEvent::TurnFailed { node, error } => Some(
                format!("[{}] turn failed: {}", self.name(node), error)
                    .red()
                    .dimmed()
                    .to_string(),
            ),
            DebateEvent::Paused => Some(
                "Debate paused. The clock keeps running; /resume to continue."
                    .yellow()
                    .to_string(),
            ),
            DebateEvent::Resumed => Some("Debate resumed.".green().to_string()),
            DebateEvent::Tick { remaining } => {
                let show = *remaining > 0 && (*remaining % 60 == 0 || *remaining <= 10);
                show.then(|| {
                    format!("{} remaining", DurationPolicy::Fixed(*remaining))
                        .dimmed()
                        .to_string()
                })
            }
            DebateEvent::Ended { transcript } => Some(format!(
                "{} ({} messages)",
                "── Debate ended ──".cyan().bold(),
                transcript.len()
            )),
        }
    }

    fn name<'a>(&'a self, id: &'a NodeId) -> &'a str {
        self.roster
            .iter()
            .find(|n| &n.id == id)
            .map(|n| n.name.as_str())
            .unwrap_or(id.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use council_domain::{MessageId, ProviderKind};

    fn printer() -> DebatePrinter {
        DebatePrinter::new(vec![Node::new("a", "Alpha", ProviderKind::Google, "gemini")])
    }

    #[test]
    fn test_node_message_printed_user_message_not() {
        let p = printer();
        let node_msg = DebateMessage::new(MessageId(0), Speaker::Node("a".into()), "Objection!");
        let line = p.format_event(&DebateEvent::MessageAppended(node_msg)).unwrap();
        assert!(line.contains("[Alpha]"));
        assert!(line.contains("Objection!"));

        let user_msg = DebateMessage::new(MessageId(1), Speaker::User, "Hi");
        assert!(p.format_event(&DebateEvent::MessageAppended(user_msg)).is_none());
    }

    #[test]
    fn test_ticks_thinned() {
        let p = printer();
        assert!(p.format_event(&DebateEvent::Tick { remaining: 120 }).is_some());
        assert!(p.format_event(&DebateEvent::Tick { remaining: 95 }).is_none());
        assert!(p.format_event(&DebateEvent::Tick { remaining: 3 }).is_some());
        assert!(p.format_event(&DebateEvent::Tick { remaining: 0 }).is_none());
    }

    #[test]
    fn test_failed_turn_names_node() {
        let line = printer()
            .format_event(&DebateEvent::TurnFailed {
                node: "a".into(),
                error: "Connection error: refused".to_string(),
            })
            .unwrap();
        assert!(line.contains("Alpha"));
        assert!(line.contains("refused"));
    }

    #[tokio::test]
    async fn test_run_returns_transcript_on_end() {
        let (tx, rx) = mpsc::unbounded_channel();
        let message = DebateMessage::new(MessageId(0), Speaker::Node("a".into()), "Done.");
        tx.send(DebateEvent::Started { policy: DurationPolicy::Fixed(60) }).unwrap();
        tx.send(DebateEvent::MessageAppended(message.clone())).unwrap();
        tx.send(DebateEvent::Ended { transcript: vec![message.clone()] }).unwrap();

        let transcript = printer().run(rx).await;
        assert_eq!(transcript, vec![message]);
    }
}
