//! Live debate domain.
//!
//! - [`message::DebateMessage`]: one entry of the append-only transcript
//! - [`state`]: duration policy, lifecycle status and snapshots
//! - [`register::UserRegister`]: adaptive vocabulary heuristic
//! - [`moves::RhetoricalMove`]: rotating rhetorical nudges

pub mod message;
pub mod moves;
pub mod register;
pub mod state;
