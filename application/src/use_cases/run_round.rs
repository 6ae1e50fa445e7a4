//! Run Round use case
//!
//! Fans a query out to every node concurrently and waits for all of them to
//! settle. Per-node failures become sentinel responses; the result always
//! holds exactly one response per node, in the order the nodes were given.

use crate::ports::conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger};
use crate::ports::node_gateway::NodeGateway;
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::use_cases::shared::{generate_with_timeout, to_response};
use council_domain::{CouncilResponse, Node, PromptTemplate, Query, Stage};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Round preconditions that refuse the call before any network request
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RoundError {
    #[error("No ready nodes: configure at least one provider credential")]
    NoReadyNodes,

    #[error("Insufficient nodes: {ready} ready, {required} required")]
    InsufficientNodes { ready: usize, required: usize },
}

/// Use case for running one council round
pub struct RunRoundUseCase<G: NodeGateway + 'static> {
    gateway: Arc<G>,
    timeout: Option<Duration>,
    logger: Arc<dyn ConversationLogger>,
}

impl<G: NodeGateway + 'static> RunRoundUseCase<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self {
            gateway,
            timeout: None,
            logger: Arc::new(NoConversationLogger),
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(
        &self,
        query: &Query,
        nodes: &[Node],
    ) -> Result<Vec<CouncilResponse>, RoundError> {
        self.execute_with_progress(query, nodes, &NoProgress).await
    }

    /// Execute the use case with progress callbacks
    pub async fn execute_with_progress(
        &self,
        query: &Query,
        nodes: &[Node],
        progress: &dyn ProgressNotifier,
    ) -> Result<Vec<CouncilResponse>, RoundError> {
        if nodes.is_empty() {
            return Err(RoundError::NoReadyNodes);
        }

        info!("Council round with {} nodes", nodes.len());
        progress.on_phase_start(&Stage::ProcessingCouncil, nodes.len());

        // Pre-filled so a panicked task still leaves its node's slot populated
        let mut slots: Vec<CouncilResponse> = nodes
            .iter()
            .map(|n| CouncilResponse::error(n.id.clone(), &n.name, "task aborted"))
            .collect();

        let mut join_set = JoinSet::new();
        for (index, node) in nodes.iter().enumerate() {
            let gateway = Arc::clone(&self.gateway);
            let node = node.clone();
            let query = query.content().to_string();
            let timeout = self.timeout;

            join_set.spawn(async move {
                let system = PromptTemplate::round_system(&node, &query);
                let result =
                    generate_with_timeout(gateway.as_ref(), &node, &query, Some(&system), timeout)
                        .await;
                (index, to_response(&node, result))
            });
        }

        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((index, response)) => {
                    let node = &nodes[index];
                    if response.is_degraded() {
                        warn!("Node {} degraded: {}", node.id, response.content);
                    } else {
                        debug!("Node {} responded ({} chars)", node.id, response.content.len());
                    }
                    progress.on_task_complete(&Stage::ProcessingCouncil, node, &response.status);
                    self.log_response(node, &response);
                    slots[index] = response;
                }
                Err(e) => {
                    warn!("Round task join error: {}", e);
                }
            }
        }

        progress.on_phase_complete(&Stage::ProcessingCouncil);
        Ok(slots)
    }

    fn log_response(&self, node: &Node, response: &CouncilResponse) {
        self.logger.log(ConversationEvent::new(
            "round_response",
            serde_json::json!({
                "node_id": node.id.as_str(),
                "node": node.name,
                "provider": node.provider.as_str(),
                "model": node.model_id,
                "status": response.status,
                "content": response.content,
                "bytes": response.content.len(),
            }),
        ));
    }
}
