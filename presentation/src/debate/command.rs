//! Operator input during a live debate.

/// One line of operator input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DebateCommand {
    Pause,
    Resume,
    End,
    /// Posted to the debate as the user
    Say(String),
    /// A slash command that is not recognised
    Unknown(String),
}

impl DebateCommand {
    /// Parse a stdin line; blank lines yield `None`.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        let command = match line.to_lowercase().as_str() {
            "/pause" | "/p" => DebateCommand::Pause,
            "/resume" | "/r" => DebateCommand::Resume,
            "/end" | "/quit" | "/q" => DebateCommand::End,
            other if other.starts_with('/') => DebateCommand::Unknown(line.to_string()),
            _ => DebateCommand::Say(line.to_string()),
        };
        Some(command)
    }

    pub fn help() -> &'static str {
        "Commands: /pause, /resume, /end. Any other line joins the debate."
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(DebateCommand::parse("/pause"), Some(DebateCommand::Pause));
        assert_eq!(DebateCommand::parse("  /RESUME "), Some(DebateCommand::Resume));
        assert_eq!(DebateCommand::parse("/end"), Some(DebateCommand::End));
        assert_eq!(
            DebateCommand::parse("/shout"),
            Some(DebateCommand::Unknown("/shout".to_string()))
        );
    }

    #[test]
    fn test_plain_text_is_said_verbatim() {
        assert_eq!(
            DebateCommand::parse("  What about latency?\n"),
            Some(DebateCommand::Say("What about latency?".to_string()))
        );
        assert_eq!(DebateCommand::parse("   "), None);
    }
}
