//! Council run policy.
//!
//! [`CouncilPolicy`] holds the knobs of a council run that are product
//! decisions rather than derived invariants, such as how many ready nodes a
//! round needs.

use council_domain::ContextBudget;
use std::time::Duration;

/// Council run parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CouncilPolicy {
    /// Ready nodes required before a round is attempted.
    pub min_ready_nodes: usize,
    /// Run the peer review stage between the round and the debate.
    pub enable_review: bool,
    /// Upper bound on one node's round or review call.
    pub node_timeout: Option<Duration>,
    /// Budget used when building the chairman context.
    pub budget: ContextBudget,
}

impl CouncilPolicy {
    pub const DEFAULT_MIN_READY_NODES: usize = 2;

    // ==================== Builder Methods ====================

    pub fn with_min_ready_nodes(mut self, min: usize) -> Self {
        self.min_ready_nodes = min;
        self
    }

    pub fn with_review(mut self, enable: bool) -> Self {
        self.enable_review = enable;
        self
    }

    pub fn with_node_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.node_timeout = timeout;
        self
    }

    pub fn with_budget(mut self, budget: ContextBudget) -> Self {
        self.budget = budget;
        self
    }
}

impl Default for CouncilPolicy {
    fn default() -> Self {
        Self {
            min_ready_nodes: Self::DEFAULT_MIN_READY_NODES,
            enable_review: false,
            node_timeout: Some(Duration::from_secs(120)),
            budget: ContextBudget::default(),
        }
    }
}
