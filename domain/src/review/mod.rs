//! Peer review domain.

pub mod parsing;
