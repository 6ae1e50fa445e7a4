//! Application-level configuration.
//!
//! This module provides configuration types that control how use cases behave:
//!
//! - [`CouncilPolicy`] : round quorum, peer review, per-node timeout
//! - [`DebatePolicy`] : debate timer cadence and prompt budget

pub mod council_policy;
pub mod debate_policy;

pub use council_policy::CouncilPolicy;
pub use debate_policy::DebatePolicy;
