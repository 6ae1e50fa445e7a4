//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod context_budget;
mod council;
mod credentials;
mod debate;
mod output;
mod round;

pub use context_budget::FileContextBudgetConfig;
pub use council::{FileCouncilConfig, FileNodeConfig};
pub use credentials::FileCredentialsConfig;
pub use debate::FileDebateConfig;
pub use output::{FileLoggingConfig, FileOutputConfig};
pub use round::FileRoundConfig;

use serde::{Deserialize, Serialize};

/// How serious a configuration issue is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    /// The affected entry is ignored
    Error,
}

/// One problem found by [`FileConfig::validate`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigIssue {
    pub severity: Severity,
    /// Dotted path of the offending field
    pub field: String,
    pub message: String,
}

impl ConfigIssue {
    pub fn error(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, field, message)
    }

    pub fn warning(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, field, message)
    }

    pub fn info(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Info, field, message)
    }

    fn new(severity: Severity, field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity,
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl std::fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Roster: preset or explicit members, and the chairman
    pub council: FileCouncilConfig,
    /// Provider keys
    pub credentials: FileCredentialsConfig,
    /// Round quorum, peer review and per-node timeout
    pub round: FileRoundConfig,
    /// Debate length and timer cadence
    pub debate: FileDebateConfig,
    /// Prompt quoting budgets
    pub context_budget: FileContextBudgetConfig,
    /// Output settings
    pub output: FileOutputConfig,
    /// Conversation and diagnostic log locations
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    ///
    /// Never fails the load; callers decide what to print.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        self.council.validate(&mut issues);
        self.round.validate(&mut issues);
        self.debate.validate(&mut issues);
        issues.extend(self.context_budget.to_context_budget().1);
        issues
    }

    pub fn has_errors(issues: &[ConfigIssue]) -> bool {
        issues.iter().any(ConfigIssue::is_error)
    }
}
