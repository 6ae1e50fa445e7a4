//! Orchestration value objects - immutable result types for council phases.
//!
//! - [`CouncilResponse`] - one node's first-pass answer, or a sentinel placeholder
//! - [`PeerReview`] - one node's critique of another's answer
//! - [`SynthesisResult`] - the chairman's verdict and whether its stream completed

use crate::council::node::NodeId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome classification of a per-node call
///
/// Anything other than `Ok` is a sentinel: a degraded result rendered inline
/// rather than a thrown error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResponseStatus {
    Ok,
    /// Provider not configured (no credential)
    Skipped,
    /// Provider rejected the credential
    Unauthorized,
    /// Transport or protocol failure
    Error { message: String },
}

impl ResponseStatus {
    pub fn is_ok(&self) -> bool {
        matches!(self, ResponseStatus::Ok)
    }

    /// Sentinel prefix used when rendering degraded content.
    pub fn prefix(&self) -> Option<&'static str> {
        match self {
            ResponseStatus::Ok => None,
            ResponseStatus::Skipped => Some("[Skipped]"),
            ResponseStatus::Unauthorized => Some("[Unauthorized]"),
            ResponseStatus::Error { .. } => Some("[Error]"),
        }
    }

    /// Placeholder text shown in place of content.
    pub fn render(&self, node_name: &str) -> Option<String> {
        match self {
            ResponseStatus::Ok => None,
            ResponseStatus::Skipped => {
                Some(format!("[Skipped] {}: Provider not configured.", node_name))
            }
            ResponseStatus::Unauthorized => Some(format!(
                "[Unauthorized] {}: Invalid or missing API key.",
                node_name
            )),
            ResponseStatus::Error { message } => {
                Some(format!("[Error] {}: {}", node_name, message))
            }
        }
    }
}

/// A single node's result for one round (created once, never mutated)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CouncilResponse {
    pub node_id: NodeId,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    pub status: ResponseStatus,
}

impl CouncilResponse {
    pub fn success(node_id: NodeId, content: impl Into<String>) -> Self {
        Self {
            node_id,
            content: content.into(),
            timestamp: Utc::now(),
            status: ResponseStatus::Ok,
        }
    }

    /// Build a degraded response whose content is the rendered placeholder.
    pub fn degraded(node_id: NodeId, node_name: &str, status: ResponseStatus) -> Self {
        let content = status.render(node_name).unwrap_or_default();
        Self {
            node_id,
            content,
            timestamp: Utc::now(),
            status,
        }
    }

    pub fn skipped(node_id: NodeId, node_name: &str) -> Self {
        Self::degraded(node_id, node_name, ResponseStatus::Skipped)
    }

    pub fn unauthorized(node_id: NodeId, node_name: &str) -> Self {
        Self::degraded(node_id, node_name, ResponseStatus::Unauthorized)
    }

    pub fn error(node_id: NodeId, node_name: &str, message: impl Into<String>) -> Self {
        Self::degraded(
            node_id,
            node_name,
            ResponseStatus::Error {
                message: message.into(),
            },
        )
    }

    pub fn is_degraded(&self) -> bool {
        !self.status.is_ok()
    }
}

/// Critique of one node's round response by another node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerReview {
    pub reviewer_id: NodeId,
    pub target_id: NodeId,
    pub content: String,
    /// Score from 1 to 10
    pub score: u8,
}

impl PeerReview {
    pub fn new(
        reviewer_id: NodeId,
        target_id: NodeId,
        content: impl Into<String>,
        score: u8,
    ) -> Self {
        Self {
            reviewer_id,
            target_id,
            content: content.into(),
            score: score.clamp(1, 10),
        }
    }
}

/// Whether a verdict stream ran to completion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SynthesisCompletion {
    Complete,
    /// The stream failed part-way; `text` holds only what arrived.
    Interrupted { reason: String },
}

/// The chairman's verdict
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynthesisResult {
    pub chairman_id: NodeId,
    pub text: String,
    pub completion: SynthesisCompletion,
}

impl SynthesisResult {
    pub fn complete(chairman_id: NodeId, text: impl Into<String>) -> Self {
        Self {
            chairman_id,
            text: text.into(),
            completion: SynthesisCompletion::Complete,
        }
    }

    pub fn interrupted(
        chairman_id: NodeId,
        partial: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            chairman_id,
            text: partial.into(),
            completion: SynthesisCompletion::Interrupted {
                reason: reason.into(),
            },
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self.completion, SynthesisCompletion::Complete)
    }

    /// Text with an error marker appended when the stream was interrupted.
    pub fn display_text(&self) -> String {
        match &self.completion {
            SynthesisCompletion::Complete => self.text.clone(),
            SynthesisCompletion::Interrupted { reason } => {
                format!("{}\n\n[Incomplete] Verdict stream interrupted: {}", self.text, reason)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinel_rendering() {
        let r = CouncilResponse::skipped(NodeId::new("a"), "Alpha");
        assert!(r.is_degraded());
        assert_eq!(r.content, "[Skipped] Alpha: Provider not configured.");

        let r = CouncilResponse::unauthorized(NodeId::new("a"), "Alpha");
        assert!(r.content.starts_with("[Unauthorized] Alpha"));

        let r = CouncilResponse::error(NodeId::new("a"), "Alpha", "timeout");
        assert_eq!(r.content, "[Error] Alpha: timeout");
        assert_eq!(
            r.status,
            ResponseStatus::Error {
                message: "timeout".to_string()
            }
        );
    }

    #[test]
    fn test_success_is_not_degraded() {
        let r = CouncilResponse::success(NodeId::new("a"), "answer");
        assert!(!r.is_degraded());
        assert!(r.status.prefix().is_none());
    }

    #[test]
    fn test_review_score_clamped() {
        let review = PeerReview::new(NodeId::new("a"), NodeId::new("b"), "meh", 42);
        assert_eq!(review.score, 10);
        let review = PeerReview::new(NodeId::new("a"), NodeId::new("b"), "meh", 0);
        assert_eq!(review.score, 1);
    }

    #[test]
    fn test_interrupted_synthesis_is_marked() {
        let result = SynthesisResult::interrupted(NodeId::new("c"), "partial verdict", "connection reset");
        assert!(!result.is_complete());
        assert_eq!(result.text, "partial verdict");
        assert!(result.display_text().contains("[Incomplete]"));
        assert!(result.display_text().starts_with("partial verdict"));

        let done = SynthesisResult::complete(NodeId::new("c"), "verdict");
        assert_eq!(done.display_text(), "verdict");
    }

    #[test]
    fn test_status_serde_shape() {
        let json = serde_json::to_value(ResponseStatus::Error {
            message: "x".to_string(),
        })
        .unwrap();
        assert_eq!(json["kind"], "error");
        assert_eq!(json["message"], "x");
    }
}
