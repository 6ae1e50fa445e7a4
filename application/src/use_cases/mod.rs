//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod debate;
pub mod peer_review;
pub mod readiness;
pub mod run_council;
pub mod run_round;
pub(crate) mod shared;
pub mod synthesize;
pub mod verify_keys;

#[cfg(test)]
pub(crate) mod test_support;
