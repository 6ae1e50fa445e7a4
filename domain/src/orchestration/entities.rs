//! Orchestration domain entities

use super::value_objects::{CouncilResponse, PeerReview, SynthesisResult};
use crate::debate::message::DebateMessage;
use serde::{Deserialize, Serialize};

/// Workflow stage of a council run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    #[default]
    Idle,
    /// Round in flight: every ready node answers independently
    ProcessingCouncil,
    /// Nodes critique each other's round responses
    PeerReview,
    /// Live debate between nodes and the operator
    Debate,
    /// Chairman streaming the verdict
    Synthesizing,
    Completed,
    Error,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Idle => "idle",
            Stage::ProcessingCouncil => "processing_council",
            Stage::PeerReview => "peer_review",
            Stage::Debate => "debate",
            Stage::Synthesizing => "synthesizing",
            Stage::Completed => "completed",
            Stage::Error => "error",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Stage::Idle => "Idle",
            Stage::ProcessingCouncil => "Council Analysis",
            Stage::PeerReview => "Peer Review",
            Stage::Debate => "Live Debate",
            Stage::Synthesizing => "Synthesis",
            Stage::Completed => "Completed",
            Stage::Error => "Error",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Stage::Completed | Stage::Error)
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Everything a council run produced (Entity)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CouncilRecord {
    pub query: String,
    pub stage: Stage,
    pub responses: Vec<CouncilResponse>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reviews: Vec<PeerReview>,
    #[serde(default)]
    pub transcript: Vec<DebateMessage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub synthesis: Option<SynthesisResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CouncilRecord {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    /// Responses that carry real content.
    pub fn healthy_responses(&self) -> impl Iterator<Item = &CouncilResponse> {
        self.responses.iter().filter(|r| !r.is_degraded())
    }

    pub fn fail(&mut self, error: impl Into<String>) {
        self.stage = Stage::Error;
        self.error = Some(error.into());
    }
}
