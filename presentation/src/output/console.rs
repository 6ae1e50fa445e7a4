//! Console output formatter for council records

use crate::output::formatter::OutputFormatter;
use colored::Colorize;
use council_application::KeyValidity;
use council_domain::{
    CouncilRecord, CredentialSet, DebateMessage, Node, NodeId, OutputFormat, ProviderKind,
    Speaker,
};

/// Formats council records for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format in the requested output format
    pub fn render(
        format: OutputFormat,
        record: &CouncilRecord,
        roster: &[Node],
        chairman: &Node,
    ) -> String {
        match format {
            OutputFormat::Full => Self::format(record, roster, chairman),
            OutputFormat::Synthesis => Self::format_synthesis_only(record, chairman),
            OutputFormat::Json => Self::format_json(record),
        }
    }

    /// Format the complete council record
    pub fn format(record: &CouncilRecord, roster: &[Node], chairman: &Node) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("LLM Council Record"));
        output.push('\n');

        output.push_str(&format!("{} {}\n\n", "Question:".cyan().bold(), record.query));

        let names: Vec<&str> = roster.iter().map(|n| n.name.as_str()).collect();
        output.push_str(&format!("{} {}\n", "Council:".cyan().bold(), names.join(", ")));
        output.push_str(&format!("{} {}\n", "Chairman:".cyan().bold(), chairman.name));

        output.push_str(&Self::format_round(record, roster));

        // Stage 3: Debate (if any)
        if !record.transcript.is_empty() {
            output.push_str(&Self::section_header("Stage 3: Debate"));
            for message in &record.transcript {
                output.push_str(&Self::format_message(message, roster));
                output.push('\n');
            }
        }

        output.push_str(&Self::section_header("Verdict"));
        output.push_str(&format!(
            "\n{}\n\n{}\n",
            format!("Chairman: {}", chairman.name).yellow().bold(),
            Self::verdict_text(record)
        ));

        output.push_str(&Self::footer());
        output
    }

    /// The round responses and peer reviews
    pub fn format_round(record: &CouncilRecord, roster: &[Node]) -> String {
        let mut output = String::new();

        // Stage 1: Round
        output.push_str(&Self::section_header("Stage 1: Council Round"));
        for response in &record.responses {
            let name = Self::node_name(roster, &response.node_id);
            match response.status.render(name) {
                Some(placeholder) => {
                    output.push_str(&format!("\n{}\n", placeholder.red()));
                }
                None => {
                    output.push_str(&format!(
                        "\n{}\n{}\n",
                        format!("── {} ──", name).yellow().bold(),
                        response.content
                    ));
                }
            }
        }

        // Stage 2: Peer reviews (if any)
        if !record.reviews.is_empty() {
            output.push_str(&Self::section_header("Stage 2: Peer Review"));
            for review in &record.reviews {
                output.push_str(&format!(
                    "\n{} {}\n{}\n",
                    format!(
                        "── {} reviewing {} ──",
                        Self::node_name(roster, &review.reviewer_id),
                        Self::node_name(roster, &review.target_id)
                    )
                    .yellow()
                    .bold(),
                    format!("score {}/10", review.score).dimmed(),
                    review.content
                ));
            }
        }
        output
    }

    /// Format as JSON
    pub fn format_json(record: &CouncilRecord) -> String {
        serde_json::to_string_pretty(record).unwrap_or_else(|_| "{}".to_string())
    }

    /// Format the verdict only (concise output)
    pub fn format_synthesis_only(record: &CouncilRecord, chairman: &Node) -> String {
        let mut output = String::new();

        output.push_str(&format!("{}\n\n", "=== Council Verdict ===".cyan().bold()));
        output.push_str(&format!("{} {}\n", "Q:".bold(), record.query));
        output.push_str(&format!(
            "{} {} ({} of {} nodes answered)\n\n",
            "Chairman:".dimmed(),
            chairman.name,
            record.healthy_responses().count(),
            record.responses.len()
        ));

        output.push_str(&Self::verdict_text(record));
        output.push('\n');
        output
    }

    /// One debate line: `[Speaker] content`
    pub fn format_message(message: &DebateMessage, roster: &[Node]) -> String {
        match &message.speaker {
            Speaker::User => format!("{} {}", "[You]".green().bold(), message.content),
            Speaker::Node(id) => format!(
                "{} {}",
                format!("[{}]", Self::node_name(roster, id)).yellow().bold(),
                message.content
            ),
        }
    }

    /// The roster with readiness markers, for `--show-config`.
    pub fn format_roster(roster: &[Node], chairman: &Node, credentials: &CredentialSet) -> String {
        let mut output = String::new();
        output.push_str(&format!("{}\n", "Council roster:".cyan().bold()));
        for node in roster.iter().chain(std::iter::once(chairman)) {
            let marker = if credentials.is_ready(node) {
                "ready".green()
            } else {
                "no key".red()
            };
            let role = if node.is_chairman() { " (chairman)" } else { "" };
            output.push_str(&format!(
                "  [{}] {}{} - {} / {}\n",
                marker,
                node.name,
                role,
                node.provider.display_name(),
                node.model_id
            ));
        }
        output
    }

    /// Key verification report, for `--verify-keys`.
    pub fn format_key_report(results: &[(ProviderKind, KeyValidity)]) -> String {
        if results.is_empty() {
            return format!("{}\n", "No provider keys configured.".yellow());
        }
        let mut output = format!("{}\n", "Provider keys:".cyan().bold());
        for (provider, validity) in results {
            let verdict = if validity.is_valid() {
                "valid".green()
            } else {
                "invalid".red()
            };
            output.push_str(&format!("  {:<28} {}\n", provider.display_name(), verdict));
        }
        output
    }

    fn verdict_text(record: &CouncilRecord) -> String {
        match &record.synthesis {
            Some(synthesis) => synthesis.display_text(),
            None => record
                .error
                .clone()
                .unwrap_or_else(|| "No verdict was produced.".to_string()),
        }
    }

    fn node_name<'a>(roster: &'a [Node], id: &'a NodeId) -> &'a str {
        roster
            .iter()
            .find(|n| &n.id == id)
            .map(|n| n.name.as_str())
            .unwrap_or(id.as_str())
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format(&self, record: &CouncilRecord, roster: &[Node], chairman: &Node) -> String {
        Self::format(record, roster, chairman)
    }

    fn format_json(&self, record: &CouncilRecord) -> String {
        Self::format_json(record)
    }

    fn format_synthesis_only(&self, record: &CouncilRecord, chairman: &Node) -> String {
        Self::format_synthesis_only(record, chairman)
    }
}
