//! Application layer for llm-council
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{CouncilPolicy, DebatePolicy};
pub use ports::{
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    key_verifier::{KeyValidity, KeyVerifier},
    node_gateway::{GatewayError, NodeGateway, StreamHandle, StreamOutcome},
    progress::{NoProgress, ProgressNotifier},
};
pub use use_cases::debate::{DebateContext, DebateController, DebateError, DebateEvent};
pub use use_cases::peer_review::RunPeerReviewUseCase;
pub use use_cases::readiness::{ReadinessFilter, ensure_quorum};
pub use use_cases::run_council::{
    CouncilSession, RunCouncilError, RunCouncilInput, RunCouncilUseCase,
};
pub use use_cases::run_round::{RoundError, RunRoundUseCase};
pub use use_cases::synthesize::{SynthesisError, SynthesisInput, SynthesizeUseCase};
pub use use_cases::verify_keys::VerifyKeysUseCase;
