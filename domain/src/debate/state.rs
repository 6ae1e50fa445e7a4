//! Debate lifecycle types.

use super::message::DebateMessage;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How long a debate may run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DurationPolicy {
    /// Countdown in whole seconds; reaching zero ends the debate.
    Fixed(u64),
    /// Runs until explicitly ended.
    Unlimited,
}

impl DurationPolicy {
    pub fn fixed(duration: Duration) -> Self {
        DurationPolicy::Fixed(duration.as_secs())
    }

    /// Build from a raw seconds value; zero means unlimited.
    pub fn from_secs(secs: u64) -> Self {
        match secs {
            0 => DurationPolicy::Unlimited,
            secs => DurationPolicy::Fixed(secs),
        }
    }

    pub fn seconds(&self) -> Option<u64> {
        match self {
            DurationPolicy::Fixed(s) => Some(*s),
            DurationPolicy::Unlimited => None,
        }
    }
}

impl Default for DurationPolicy {
    fn default() -> Self {
        DurationPolicy::Fixed(300)
    }
}

impl std::fmt::Display for DurationPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DurationPolicy::Fixed(s) => write!(f, "{}:{:02}", s / 60, s % 60),
            DurationPolicy::Unlimited => write!(f, "unlimited"),
        }
    }
}

/// Debate state machine states
///
/// `Idle → Running → {Paused ⇄ Running} → Ended`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DebateStatus {
    Idle,
    Running,
    Paused,
    Ended,
}

impl DebateStatus {
    /// Running or Paused.
    pub fn is_live(&self) -> bool {
        matches!(self, DebateStatus::Running | DebateStatus::Paused)
    }
}

/// Read-only view of a debate session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebateSnapshot {
    pub status: DebateStatus,
    /// Monotonic turn counter; the next speaker is `ready[turn_index % len]`.
    pub turn_index: usize,
    /// Seconds left on the countdown; `None` when unlimited or not started.
    pub remaining_secs: Option<u64>,
    pub transcript: Vec<DebateMessage>,
}
