//! Round configuration from TOML (`[round]` section)

use super::ConfigIssue;
use council_application::CouncilPolicy;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw round configuration.
///
/// ```toml
/// [round]
/// min_ready_nodes = 2
/// review = true
/// node_timeout_secs = 90   # 0 disables the timeout
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRoundConfig {
    pub min_ready_nodes: usize,
    /// Run the peer review phase after the round
    pub review: bool,
    pub node_timeout_secs: u64,
}

impl Default for FileRoundConfig {
    fn default() -> Self {
        let policy = CouncilPolicy::default();
        Self {
            min_ready_nodes: policy.min_ready_nodes,
            review: policy.enable_review,
            node_timeout_secs: policy.node_timeout.map(|d| d.as_secs()).unwrap_or(0),
        }
    }
}

impl FileRoundConfig {
    pub fn to_policy(&self) -> CouncilPolicy {
        let timeout = (self.node_timeout_secs > 0).then(|| Duration::from_secs(self.node_timeout_secs));
        CouncilPolicy::default()
            .with_min_ready_nodes(self.min_ready_nodes.max(1))
            .with_review(self.review)
            .with_node_timeout(timeout)
    }

    pub(super) fn validate(&self, issues: &mut Vec<ConfigIssue>) {
        if self.min_ready_nodes == 0 {
            issues.push(ConfigIssue::warning(
                "round.min_ready_nodes",
                "min_ready_nodes must be at least 1, using 1",
            ));
        }
    }
}
