//! Council orchestration domain
//!
//! Result types for each phase of a council run and the workflow stage that
//! ties them together.

pub mod entities;
pub mod value_objects;
