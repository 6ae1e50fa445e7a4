//! Run Council use case
//!
//! Orchestrates the full council flow:
//!
//! 1. Readiness and quorum check (refused before any network call)
//! 2. Round: every ready node answers independently
//! 3. Optional peer review
//! 4. Optional live debate, driven by the caller through a [`DebateController`]
//! 5. Synthesis: the chairman streams the verdict
//!
//! Interactive callers use [`convene`](RunCouncilUseCase::convene),
//! [`open_debate`](RunCouncilUseCase::open_debate) and
//! [`conclude`](RunCouncilUseCase::conclude) separately;
//! [`execute_with_progress`](RunCouncilUseCase::execute_with_progress) runs
//! them back to back.

use crate::config::{CouncilPolicy, DebatePolicy};
use crate::ports::conversation_logger::{ConversationLogger, NoConversationLogger};
use crate::ports::node_gateway::NodeGateway;
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::use_cases::debate::{DebateContext, DebateController, DebateError, DebateEvent};
use crate::use_cases::peer_review::RunPeerReviewUseCase;
use crate::use_cases::readiness::{ReadinessFilter, ensure_quorum};
use crate::use_cases::run_round::{RoundError, RunRoundUseCase};
use crate::use_cases::synthesize::{SynthesisError, SynthesisInput, SynthesizeUseCase};
use council_domain::{
    CouncilRecord, CouncilResponse, CredentialSet, DebateMessage, DurationPolicy, Node, Query,
    ResponseStatus, Stage,
};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Errors that can occur during a council run
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RunCouncilError {
    #[error(transparent)]
    Round(#[from] RoundError),

    #[error("Debate error: {0}")]
    Debate(#[from] DebateError),

    #[error(transparent)]
    Synthesis(#[from] SynthesisError),
}

/// Input for the RunCouncil use case
#[derive(Debug, Clone)]
pub struct RunCouncilInput {
    pub query: Query,
    pub roster: Vec<Node>,
    pub chairman: Node,
    pub credentials: CredentialSet,
}

/// A convened council: round (and review) done, verdict pending
#[derive(Debug, Clone)]
pub struct CouncilSession {
    pub query: Query,
    pub roster: Vec<Node>,
    pub ready: Vec<Node>,
    pub chairman: Node,
    pub record: CouncilRecord,
}

/// Use case for running a council
pub struct RunCouncilUseCase<G: NodeGateway + 'static> {
    gateway: Arc<G>,
    policy: CouncilPolicy,
    debate_policy: DebatePolicy,
    logger: Arc<dyn ConversationLogger>,
}

impl<G: NodeGateway + 'static> RunCouncilUseCase<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self {
            gateway,
            policy: CouncilPolicy::default(),
            debate_policy: DebatePolicy::default(),
            logger: Arc::new(NoConversationLogger),
        }
    }

    pub fn with_policy(mut self, policy: CouncilPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_debate_policy(mut self, policy: DebatePolicy) -> Self {
        self.debate_policy = policy;
        self
    }

    pub fn with_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Round and verdict, no debate, no progress.
    pub async fn execute(&self, input: RunCouncilInput) -> Result<CouncilRecord, RunCouncilError> {
        self.execute_with_progress(input, None, &NoProgress).await
    }

    /// Run every stage back to back.
    ///
    /// With `Some(duration)` a debate runs unattended until it ends; an
    /// unlimited debate needs an operator, so use `open_debate` for that.
    pub async fn execute_with_progress(
        &self,
        input: RunCouncilInput,
        debate: Option<DurationPolicy>,
        progress: &dyn ProgressNotifier,
    ) -> Result<CouncilRecord, RunCouncilError> {
        let mut session = self.convene(input, progress).await?;
        let transcript = match debate {
            Some(duration) => {
                let (controller, _events) = self.open_debate(&mut session);
                controller.start(duration)?;
                controller.wait_ended().await
            }
            None => Vec::new(),
        };
        self.conclude(session, transcript, progress).await
    }

    /// Readiness, quorum, round and optional peer review.
    ///
    /// An unready chairman is refused here, before any node is called.
    /// The record holds one response per roster node; unready nodes are
    /// skipped without a call.
    pub async fn convene(
        &self,
        input: RunCouncilInput,
        progress: &dyn ProgressNotifier,
    ) -> Result<CouncilSession, RunCouncilError> {
        let RunCouncilInput {
            query,
            roster,
            chairman,
            credentials,
        } = input;

        let filter = ReadinessFilter::new(&credentials);
        let ready = filter.ready_members(&roster);
        ensure_quorum(ready.len(), self.policy.min_ready_nodes)?;
        if !filter.is_ready(&chairman) {
            return Err(SynthesisError::ChairmanNotReady(chairman.name.clone()).into());
        }
        info!("Convening council: {}/{} nodes ready", ready.len(), roster.len());

        let mut record = CouncilRecord::new(query.content());
        record.stage = Stage::ProcessingCouncil;

        let round = RunRoundUseCase::new(Arc::clone(&self.gateway))
            .with_timeout(self.policy.node_timeout)
            .with_logger(Arc::clone(&self.logger))
            .execute_with_progress(&query, &ready, progress)
            .await?;

        let mut round = round.into_iter();
        record.responses = roster
            .iter()
            .map(|node| {
                if filter.is_ready(node) {
                    round.next().unwrap_or_else(|| {
                        CouncilResponse::error(node.id.clone(), &node.name, "missing round result")
                    })
                } else {
                    debug!("Node {} skipped: no credential", node.id);
                    CouncilResponse::skipped(node.id.clone(), &node.name)
                }
            })
            .collect();

        let healthy = record.healthy_responses().count();
        if self.policy.enable_review && healthy > 1 {
            record.stage = Stage::PeerReview;
            record.reviews = RunPeerReviewUseCase::new(Arc::clone(&self.gateway))
                .with_timeout(self.policy.node_timeout)
                .with_budget(self.policy.budget)
                .with_logger(Arc::clone(&self.logger))
                .execute_with_progress(&query, &ready, &roster, &record.responses, progress)
                .await;
        } else {
            debug!("Skipping peer review ({} healthy responses)", healthy);
        }

        Ok(CouncilSession {
            query,
            roster,
            ready,
            chairman,
            record,
        })
    }

    /// Create an idle debate seeded with the round responses.
    pub fn open_debate(
        &self,
        session: &mut CouncilSession,
    ) -> (DebateController<G>, mpsc::UnboundedReceiver<DebateEvent>) {
        session.record.stage = Stage::Debate;
        let context = DebateContext {
            query: session.query.content().to_string(),
            roster: session.roster.clone(),
            speakers: session.ready.clone(),
            stances: session.record.responses.clone(),
        };
        DebateController::new(
            Arc::clone(&self.gateway),
            context,
            self.debate_policy.clone(),
            Arc::clone(&self.logger),
        )
    }

    /// Stream the chairman's verdict over everything gathered so far.
    ///
    /// A verdict that cannot be attempted still returns the record, in
    /// [`Stage::Error`] with the reason, so the round and transcript survive.
    pub async fn conclude(
        &self,
        session: CouncilSession,
        transcript: Vec<DebateMessage>,
        progress: &dyn ProgressNotifier,
    ) -> Result<CouncilRecord, RunCouncilError> {
        let CouncilSession {
            query,
            roster,
            chairman,
            mut record,
            ..
        } = session;
        record.transcript = transcript;
        record.stage = Stage::Synthesizing;
        progress.on_phase_start(&Stage::Synthesizing, 1);
        progress.on_synthesis_start(&chairman);

        let input = SynthesisInput {
            query,
            chairman: chairman.clone(),
            roster,
            responses: record.responses.clone(),
            reviews: record.reviews.clone(),
            transcript: record.transcript.clone(),
        };
        let outcome = SynthesizeUseCase::new(Arc::clone(&self.gateway))
            .with_budget(self.policy.budget)
            .with_logger(Arc::clone(&self.logger))
            .execute_stream(&input, |chunk| progress.on_synthesis_chunk(chunk))
            .await;

        let result = match outcome {
            Ok(result) => result,
            Err(e) => {
                warn!("Synthesis failed: {}", e);
                progress.on_synthesis_end(false);
                progress.on_phase_complete(&Stage::Synthesizing);
                record.fail(e.to_string());
                return Ok(record);
            }
        };

        progress.on_synthesis_end(result.is_complete());
        let status = if result.is_complete() {
            ResponseStatus::Ok
        } else {
            ResponseStatus::Error {
                message: "verdict stream interrupted".to_string(),
            }
        };
        progress.on_task_complete(&Stage::Synthesizing, &chairman, &status);
        progress.on_phase_complete(&Stage::Synthesizing);

        record.synthesis = Some(result);
        record.stage = Stage::Completed;
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::node_gateway::GatewayError;
    use crate::use_cases::test_support::{
        RecordingLogger, Reply, ScriptedGateway, local_node, node,
    };
    use council_domain::{NodeRole, ProviderKind};

    fn input(roster: Vec<Node>, credentials: CredentialSet) -> RunCouncilInput {
        RunCouncilInput {
            query: Query::new("Monorepo or polyrepo?").unwrap(),
            roster,
            chairman: node("chair").with_role(NodeRole::Chairman),
            credentials,
        }
    }

    fn openai_key() -> CredentialSet {
        CredentialSet::new().with_key(ProviderKind::OpenAi, "sk-test")
    }

    fn groq_node(id: &str) -> Node {
        Node::new(id, "Groq node", ProviderKind::Groq, "llama3-70b-8192")
    }

    #[tokio::test]
    async fn test_refused_before_any_call() {
        let gateway = Arc::new(ScriptedGateway::new());
        let use_case = RunCouncilUseCase::new(Arc::clone(&gateway));

        let err = use_case
            .execute(input(vec![node("a"), node("b")], CredentialSet::new()))
            .await
            .unwrap_err();
        assert_eq!(err, RunCouncilError::Round(RoundError::NoReadyNodes));

        let err = use_case
            .execute(input(vec![node("a"), local_node("b")], CredentialSet::new()))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            RunCouncilError::Round(RoundError::InsufficientNodes {
                ready: 1,
                required: 2
            })
        );
        assert!(gateway.calls().is_empty());
    }

    #[tokio::test]
    async fn test_roster_shape_preserved_with_skipped_node() {
        let gateway = Arc::new(ScriptedGateway::new());
        let record = RunCouncilUseCase::new(Arc::clone(&gateway))
            .execute(input(vec![node("a"), groq_node("g"), node("b")], openai_key()))
            .await
            .unwrap();

        assert_eq!(record.responses.len(), 3);
        assert_eq!(record.responses[1].status, ResponseStatus::Skipped);
        assert_eq!(record.healthy_responses().count(), 2);
        assert_eq!(gateway.call_count("g"), 0);
        assert_eq!(record.stage, Stage::Completed);
        assert!(record.synthesis.unwrap().is_complete());
    }

    #[tokio::test(start_paused = true)]
    async fn test_full_flow_with_review_and_debate() {
        let gateway = Arc::new(ScriptedGateway::new());
        let logger = Arc::new(RecordingLogger::default());
        let record = RunCouncilUseCase::new(Arc::clone(&gateway))
            .with_policy(CouncilPolicy::default().with_review(true))
            .with_logger(logger.clone())
            .execute_with_progress(
                input(vec![node("a"), node("b")], openai_key()),
                Some(DurationPolicy::Fixed(5)),
                &NoProgress,
            )
            .await
            .unwrap();

        assert_eq!(record.reviews.len(), 2);
        assert!(!record.transcript.is_empty());
        assert_eq!(record.stage, Stage::Completed);

        let chair_call = gateway.calls().into_iter().find(|c| c.node == "chair").unwrap();
        assert!(chair_call.prompt.contains("--- PEER REVIEWS ---"));
        assert!(chair_call.prompt.contains("--- DEBATE TRANSCRIPT ---"));

        let types = logger.types();
        assert!(types.contains(&"round_response".to_string()));
        assert!(types.contains(&"peer_review".to_string()));
        assert!(types.contains(&"debate_message".to_string()));
        assert!(types.contains(&"debate_ended".to_string()));
        assert_eq!(types.last().map(String::as_str), Some("synthesis"));
    }

    #[tokio::test]
    async fn test_unready_chairman_refused_before_round() {
        let gateway = Arc::new(ScriptedGateway::new());
        let mut council = input(vec![node("a"), node("b")], openai_key());
        council.chairman = groq_node("chair").with_role(NodeRole::Chairman);

        let err = RunCouncilUseCase::new(Arc::clone(&gateway))
            .convene(council, &NoProgress)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            RunCouncilError::Synthesis(SynthesisError::ChairmanNotReady("Groq node".into()))
        );
        assert!(gateway.calls().is_empty());
    }

    #[tokio::test]
    async fn test_failed_verdict_keeps_record() {
        let gateway = Arc::new(ScriptedGateway::new().with_reply(
            "chair",
            Reply::Fail(GatewayError::NotConfigured("openai".into())),
        ));
        let use_case = RunCouncilUseCase::new(Arc::clone(&gateway));
        let mut session = use_case
            .convene(input(vec![node("a"), node("b")], openai_key()), &NoProgress)
            .await
            .unwrap();
        let (debate, _events) = use_case.open_debate(&mut session);
        debate.start(DurationPolicy::Unlimited).unwrap();
        debate.inject_user_message("Monorepo, surely.").unwrap();
        let transcript = debate.end().unwrap();

        let record = use_case.conclude(session, transcript, &NoProgress).await.unwrap();
        assert_eq!(record.stage, Stage::Error);
        assert!(record.synthesis.is_none());
        assert!(record.error.as_deref().unwrap().contains("Node CHAIR"));
        assert_eq!(record.healthy_responses().count(), 2);
        assert_eq!(record.transcript.len(), 1);
    }

    #[tokio::test]
    async fn test_interactive_steps() {
        let gateway = Arc::new(ScriptedGateway::new());
        let use_case = RunCouncilUseCase::new(Arc::clone(&gateway));
        let mut session = use_case
            .convene(input(vec![node("a"), node("b")], openai_key()), &NoProgress)
            .await
            .unwrap();
        assert_eq!(session.record.stage, Stage::ProcessingCouncil);

        let (debate, _events) = use_case.open_debate(&mut session);
        assert_eq!(session.record.stage, Stage::Debate);
        debate.start(DurationPolicy::Unlimited).unwrap();
        debate.inject_user_message("Polyrepo, obviously.").unwrap();
        let transcript = debate.end().unwrap();

        let record = use_case.conclude(session, transcript, &NoProgress).await.unwrap();
        assert_eq!(record.transcript.len(), 1);
        assert_eq!(record.stage, Stage::Completed);
    }
}
