//! Output formatter trait

use council_domain::{CouncilRecord, Node};

/// Trait for formatting council records
pub trait OutputFormatter {
    /// Format every stage of the record
    fn format(&self, record: &CouncilRecord, roster: &[Node], chairman: &Node) -> String;

    /// Format as JSON
    fn format_json(&self, record: &CouncilRecord) -> String;

    /// Format the verdict only (concise output)
    fn format_synthesis_only(&self, record: &CouncilRecord, chairman: &Node) -> String;
}
