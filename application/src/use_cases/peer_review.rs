//! Run Peer Review use case
//!
//! Every reviewer critiques every other node's healthy round response.
//! Reviews that fail, or come back as sentinels, are dropped.

use crate::ports::conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger};
use crate::ports::node_gateway::NodeGateway;
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::use_cases::shared::{generate_with_timeout, status_for_error};
use council_domain::{
    ContextBudget, CouncilResponse, Node, PeerReview, PromptTemplate, Query, ResponseStatus, Stage,
    parse_review_score,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tracing::{info, warn};

/// Use case for the peer review stage
pub struct RunPeerReviewUseCase<G: NodeGateway + 'static> {
    gateway: Arc<G>,
    timeout: Option<Duration>,
    budget: ContextBudget,
    logger: Arc<dyn ConversationLogger>,
}

impl<G: NodeGateway + 'static> RunPeerReviewUseCase<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self {
            gateway,
            timeout: None,
            budget: ContextBudget::default(),
            logger: Arc::new(NoConversationLogger),
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Budget bounding how much of each target response is quoted.
    pub fn with_budget(mut self, budget: ContextBudget) -> Self {
        self.budget = budget;
        self
    }

    pub fn with_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub async fn execute(
        &self,
        query: &Query,
        reviewers: &[Node],
        roster: &[Node],
        responses: &[CouncilResponse],
    ) -> Vec<PeerReview> {
        self.execute_with_progress(query, reviewers, roster, responses, &NoProgress)
            .await
    }

    /// Reviews come back ordered by reviewer, then by target, as given.
    pub async fn execute_with_progress(
        &self,
        query: &Query,
        reviewers: &[Node],
        roster: &[Node],
        responses: &[CouncilResponse],
        progress: &dyn ProgressNotifier,
    ) -> Vec<PeerReview> {
        let targets: Vec<&CouncilResponse> = responses.iter().filter(|r| !r.is_degraded()).collect();

        let mut join_set = JoinSet::new();
        let mut pairs = 0usize;
        for (reviewer_idx, reviewer) in reviewers.iter().enumerate() {
            for (target_idx, target) in targets.iter().enumerate() {
                if target.node_id == reviewer.id {
                    continue;
                }
                pairs += 1;
                let target_name = roster
                    .iter()
                    .find(|n| n.id == target.node_id)
                    .map(|n| n.name.clone())
                    .unwrap_or_else(|| "Peer".to_string());
                let prompt = PromptTemplate::review_prompt(
                    query.content(),
                    &target_name,
                    &target.content,
                    &self.budget,
                );
                let gateway = Arc::clone(&self.gateway);
                let reviewer = reviewer.clone();
                let target_id = target.node_id.clone();
                let timeout = self.timeout;

                join_set.spawn(async move {
                    let result = generate_with_timeout(
                        gateway.as_ref(),
                        &reviewer,
                        &prompt,
                        Some(PromptTemplate::review_system()),
                        timeout,
                    )
                    .await;
                    (reviewer_idx, target_idx, reviewer, target_id, result)
                });
            }
        }

        info!("Peer review: {} critiques", pairs);
        progress.on_phase_start(&Stage::PeerReview, pairs);

        let mut collected = Vec::with_capacity(pairs);
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((ri, ti, reviewer, target_id, Ok(critique))) => {
                    progress.on_task_complete(&Stage::PeerReview, &reviewer, &ResponseStatus::Ok);
                    let score = parse_review_score(&critique);
                    collected.push((ri, ti, PeerReview::new(reviewer.id, target_id, critique, score)));
                }
                Ok((_, _, reviewer, target_id, Err(e))) => {
                    warn!("Review by {} of {} dropped: {}", reviewer.id, target_id, e);
                    progress.on_task_complete(&Stage::PeerReview, &reviewer, &status_for_error(&e));
                }
                Err(e) => warn!("Review task join error: {}", e),
            }
        }
        collected.sort_by_key(|(ri, ti, _)| (*ri, *ti));

        progress.on_phase_complete(&Stage::PeerReview);
        collected
            .into_iter()
            .map(|(_, _, review)| {
                self.logger.log(ConversationEvent::new(
                    "peer_review",
                    serde_json::json!({
                        "reviewer_id": review.reviewer_id.as_str(),
                        "target_id": review.target_id.as_str(),
                        "score": review.score,
                        "content": review.content,
                    }),
                ));
                review
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::node_gateway::GatewayError;
    use crate::use_cases::test_support::{Reply, ScriptedGateway, node};
    use council_domain::NodeId;

    #[tokio::test]
    async fn test_each_reviewer_skips_itself() {
        let gateway = Arc::new(
            ScriptedGateway::new()
                .with_fallback("a", Reply::Text("Critique: ok\nScore: 8".into()))
                .with_fallback("b", Reply::Text("Critique: weak".into())),
        );
        let nodes = vec![node("a"), node("b")];
        let responses = vec![
            CouncilResponse::success(NodeId::new("a"), "A's answer"),
            CouncilResponse::success(NodeId::new("b"), "B's answer"),
        ];
        let query = Query::new("q").unwrap();
        let reviews = RunPeerReviewUseCase::new(Arc::clone(&gateway))
            .execute(&query, &nodes, &nodes, &responses)
            .await;

        assert_eq!(reviews.len(), 2);
        assert_eq!(reviews[0].reviewer_id.as_str(), "a");
        assert_eq!(reviews[0].target_id.as_str(), "b");
        assert_eq!(reviews[0].score, 8);
        assert_eq!(reviews[1].reviewer_id.as_str(), "b");
        assert_eq!(reviews[1].score, 5);

        let calls = gateway.calls();
        let a_call = calls.iter().find(|c| c.node == "a").unwrap();
        assert!(a_call.prompt.contains("TARGET_NODE: Node B"));
        assert!(a_call.prompt.contains("B's answer"));
    }

    #[tokio::test]
    async fn test_degraded_targets_and_failed_reviews_dropped() {
        let gateway = Arc::new(
            ScriptedGateway::new()
                .with_fallback("a", Reply::Fail(GatewayError::Unauthorized("401".into()))),
        );
        let nodes = vec![node("a"), node("b"), node("c")];
        let responses = vec![
            CouncilResponse::success(NodeId::new("a"), "A"),
            CouncilResponse::success(NodeId::new("b"), "B"),
            CouncilResponse::skipped(NodeId::new("c"), "Node C"),
        ];
        let query = Query::new("q").unwrap();
        let reviews = RunPeerReviewUseCase::new(Arc::clone(&gateway))
            .execute(&query, &nodes, &nodes, &responses)
            .await;

        // a's reviews fail; b reviews a; c reviews a and b
        assert_eq!(reviews.len(), 3);
        assert!(reviews.iter().all(|r| r.reviewer_id.as_str() != "a"));
        assert!(reviews.iter().all(|r| r.target_id.as_str() != "c"));
    }

    #[tokio::test]
    async fn test_target_quote_follows_budget() {
        let gateway = Arc::new(ScriptedGateway::new());
        let nodes = vec![node("a"), node("b")];
        let responses = vec![
            CouncilResponse::success(NodeId::new("a"), "a".repeat(30)),
            CouncilResponse::success(NodeId::new("b"), "b".repeat(30)),
        ];
        let query = Query::new("q").unwrap();
        RunPeerReviewUseCase::new(Arc::clone(&gateway))
            .with_budget(ContextBudget::new(200, 6, 120, 12))
            .execute(&query, &nodes, &nodes, &responses)
            .await;

        let calls = gateway.calls();
        let a_call = calls.iter().find(|c| c.node == "a").unwrap();
        assert!(a_call.prompt.contains(&"b".repeat(12)));
        assert!(!a_call.prompt.contains(&"b".repeat(13)));
    }
}
