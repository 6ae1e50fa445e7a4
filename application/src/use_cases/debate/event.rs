//! Debate events delivered to observers.

use council_domain::{DebateMessage, DurationPolicy, NodeId};

/// Something that happened in a debate session
///
/// Events are sent in commit order. `Ended` is always the last event and is
/// sent exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DebateEvent {
    Started { policy: DurationPolicy },
    /// A node has been asked for its turn
    TurnStarted { node: NodeId, turn: usize },
    MessageAppended(DebateMessage),
    /// A node's turn failed; the rotation moves on
    TurnFailed { node: NodeId, error: String },
    Paused,
    Resumed,
    /// Countdown tick with seconds left
    Tick { remaining: u64 },
    Ended { transcript: Vec<DebateMessage> },
}

impl DebateEvent {
    pub fn is_ended(&self) -> bool {
        matches!(self, DebateEvent::Ended { .. })
    }
}
