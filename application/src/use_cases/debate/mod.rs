//! Live debate
//!
//! [`DebateController`] owns one debate session: a self-rescheduling turn
//! loop that rotates through the ready nodes, an independent countdown, and
//! the append-only transcript. Callers drive it with `start`, `pause`,
//! `resume`, `inject_user_message` and `end`, and observe it through the
//! [`DebateEvent`] channel returned at construction.

mod controller;
mod event;

pub use controller::{DebateContext, DebateController, DebateError};
pub use event::DebateEvent;
