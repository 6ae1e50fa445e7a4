//! Debate timer cadence.
//!
//! [`DebatePolicy`] groups the delays that drive the debate controller's
//! self-rescheduling turn loop and its countdown.

use council_domain::ContextBudget;
use std::time::Duration;

/// Debate controller timing and prompt budget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebatePolicy {
    /// Delay before the first turn after `start`.
    pub first_turn_delay: Duration,
    /// Delay between consecutive turns.
    pub turn_delay: Duration,
    /// How often a paused loop re-checks its state.
    pub pause_poll: Duration,
    /// Delay before the next turn after a resume or user interjection.
    pub rearm_delay: Duration,
    /// Countdown granularity.
    pub tick: Duration,
    /// Budget for per-turn prompt construction.
    pub budget: ContextBudget,
}

impl DebatePolicy {
    /// Preset countdown lengths offered to the operator (0 means unlimited).
    pub const DURATION_PRESETS_SECS: [u64; 4] = [60, 300, 600, 0];

    pub fn with_turn_delay(mut self, delay: Duration) -> Self {
        self.turn_delay = delay;
        self
    }

    pub fn with_budget(mut self, budget: ContextBudget) -> Self {
        self.budget = budget;
        self
    }
}

impl Default for DebatePolicy {
    fn default() -> Self {
        Self {
            first_turn_delay: Duration::from_millis(100),
            turn_delay: Duration::from_millis(400),
            pause_poll: Duration::from_millis(800),
            rearm_delay: Duration::from_millis(200),
            tick: Duration::from_secs(1),
            budget: ContextBudget::default(),
        }
    }
}
