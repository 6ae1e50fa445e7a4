//! Context budget configuration from TOML (`[context_budget]` section)

use super::ConfigIssue;
use council_domain::ContextBudget;
use serde::{Deserialize, Serialize};

/// Context budget configuration from TOML.
///
/// Controls how much quoted content enters debate turn prompts and the
/// chairman's synthesis context.
///
/// # Example
///
/// ```toml
/// [context_budget]
/// stance_preview_chars = 200
/// transcript_window = 6
/// snippet_chars = 120
/// synthesis_entry_chars = 4000
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileContextBudgetConfig {
    pub stance_preview_chars: usize,
    pub transcript_window: usize,
    pub snippet_chars: usize,
    pub synthesis_entry_chars: usize,
}

impl Default for FileContextBudgetConfig {
    fn default() -> Self {
        let budget = ContextBudget::default();
        Self {
            stance_preview_chars: budget.stance_preview_chars(),
            transcript_window: budget.transcript_window(),
            snippet_chars: budget.snippet_chars(),
            synthesis_entry_chars: budget.synthesis_entry_chars(),
        }
    }
}

impl FileContextBudgetConfig {
    /// Convert to domain `ContextBudget`, returning validation issues.
    ///
    /// Any zero value falls back to `ContextBudget::default()`.
    pub fn to_context_budget(&self) -> (ContextBudget, Vec<ConfigIssue>) {
        let fields = [
            ("stance_preview_chars", self.stance_preview_chars),
            ("transcript_window", self.transcript_window),
            ("snippet_chars", self.snippet_chars),
            ("synthesis_entry_chars", self.synthesis_entry_chars),
        ];
        let issues: Vec<ConfigIssue> = fields
            .iter()
            .filter(|(_, value)| *value == 0)
            .map(|(name, _)| {
                ConfigIssue::warning(
                    format!("context_budget.{}", name),
                    format!("{} must be positive, using the default budget", name),
                )
            })
            .collect();

        if issues.is_empty() {
            let budget = ContextBudget::new(
                self.stance_preview_chars,
                self.transcript_window,
                self.snippet_chars,
                self.synthesis_entry_chars,
            );
            (budget, issues)
        } else {
            (ContextBudget::default(), issues)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_round_trips_to_domain_default() {
        let (budget, issues) = FileContextBudgetConfig::default().to_context_budget();
        assert_eq!(budget, ContextBudget::default());
        assert!(issues.is_empty());
    }

    #[test]
    fn test_custom_budget() {
        let config = FileContextBudgetConfig {
            transcript_window: 10,
            ..Default::default()
        };
        let (budget, _) = config.to_context_budget();
        assert_eq!(budget.transcript_window(), 10);
    }

    #[test]
    fn test_zero_falls_back_with_warning() {
        let config = FileContextBudgetConfig {
            snippet_chars: 0,
            ..Default::default()
        };
        let (budget, issues) = config.to_context_budget();
        assert_eq!(budget, ContextBudget::default());
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].field, "context_budget.snippet_chars");
    }
}
