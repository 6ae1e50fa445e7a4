//! Domain layer for llm-council
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Council
//!
//! A council is a roster of independent LLM backends ("nodes") that deliberate
//! over a single query in three phases:
//!
//! - **Round**: every ready node answers the query independently
//! - **Debate**: nodes (and the human operator) take turns in a live transcript
//! - **Synthesis**: the chairman node streams one consolidated verdict
//!
//! ## Degradation
//!
//! Per-node failures never abort a phase. They surface as sentinel results
//! ([`ResponseStatus`]) rendered inline in place of real content.

pub mod config;
pub mod context;
pub mod core;
pub mod council;
pub mod debate;
pub mod orchestration;
pub mod prompt;
pub mod review;
pub mod session;

// Re-export commonly used types
pub use config::OutputFormat;
pub use context::ContextBudget;
pub use core::{
    error::DomainError,
    question::Query,
    string::{clip, flatten_newlines, truncate_chars},
};
pub use council::{
    credentials::CredentialSet,
    node::{Node, NodeId, NodeRole},
    presets::{Preset, default_chairman, default_council},
    provider::{ProtocolKind, ProviderKind},
};
pub use debate::{
    message::{DebateMessage, MessageId, Speaker},
    moves::RhetoricalMove,
    register::UserRegister,
    state::{DebateSnapshot, DebateStatus, DurationPolicy},
};
pub use orchestration::{
    entities::{CouncilRecord, Stage},
    value_objects::{
        CouncilResponse, PeerReview, ResponseStatus, SynthesisCompletion, SynthesisResult,
    },
};
pub use prompt::{DebateTurnPrompt, PromptTemplate};
pub use review::parsing::parse_review_score;
pub use session::stream::StreamEvent;
