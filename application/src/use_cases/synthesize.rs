//! Synthesize use case
//!
//! Builds the consolidated context (healthy round findings, optional peer
//! reviews, then the debate transcript) and asks the chairman for a single
//! verdict, streamed chunk by chunk.

use crate::ports::conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger};
use crate::ports::node_gateway::{GatewayError, NodeGateway};
use council_domain::{
    ContextBudget, CouncilResponse, DebateMessage, Node, PeerReview, PromptTemplate, Query,
    SynthesisResult,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Errors that stop a verdict from being attempted at all
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SynthesisError {
    #[error("Chairman {0} is not ready: configure its provider credential")]
    ChairmanNotReady(String),

    #[error("Synthesis failed: {0}")]
    Gateway(GatewayError),
}

/// Everything the chairman gets to see
#[derive(Debug, Clone)]
pub struct SynthesisInput {
    pub query: Query,
    pub chairman: Node,
    /// Used to resolve node names in the context
    pub roster: Vec<Node>,
    pub responses: Vec<CouncilResponse>,
    pub reviews: Vec<PeerReview>,
    pub transcript: Vec<DebateMessage>,
}

impl SynthesisInput {
    fn prompt(&self, budget: &ContextBudget) -> String {
        let context = PromptTemplate::synthesis_context(
            &self.roster,
            &self.responses,
            &self.reviews,
            &self.transcript,
            budget,
        );
        PromptTemplate::chairman_prompt(self.query.content(), &context)
    }
}

/// Use case for the chairman's verdict
pub struct SynthesizeUseCase<G: NodeGateway + 'static> {
    gateway: Arc<G>,
    budget: ContextBudget,
    logger: Arc<dyn ConversationLogger>,
}

impl<G: NodeGateway + 'static> SynthesizeUseCase<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self {
            gateway,
            budget: ContextBudget::default(),
            logger: Arc::new(NoConversationLogger),
        }
    }

    pub fn with_budget(mut self, budget: ContextBudget) -> Self {
        self.budget = budget;
        self
    }

    pub fn with_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Non-streaming verdict.
    pub async fn execute(&self, input: &SynthesisInput) -> Result<SynthesisResult, SynthesisError> {
        let prompt = input.prompt(&self.budget);
        let text = self
            .gateway
            .generate(&input.chairman, &prompt, input.chairman.role_instruction())
            .await
            .map_err(|e| Self::classify(&input.chairman, e))?;
        let result = SynthesisResult::complete(input.chairman.id.clone(), text);
        self.log_result(&result);
        Ok(result)
    }

    /// Stream the verdict, calling `on_chunk` for every fragment.
    ///
    /// A stream that fails part-way yields `Ok` with an interrupted result
    /// carrying the partial text. Only an unconfigured chairman is a hard
    /// error.
    pub async fn execute_stream<F>(
        &self,
        input: &SynthesisInput,
        on_chunk: F,
    ) -> Result<SynthesisResult, SynthesisError>
    where
        F: FnMut(&str),
    {
        let chairman = &input.chairman;
        info!("Synthesis by chairman {}", chairman.id);
        let prompt = input.prompt(&self.budget);

        let handle = match self
            .gateway
            .generate_stream(chairman, &prompt, chairman.role_instruction())
            .await
        {
            Ok(handle) => handle,
            Err(e) if e.is_not_configured() => {
                return Err(SynthesisError::ChairmanNotReady(chairman.name.clone()));
            }
            Err(e) => {
                warn!("Verdict stream could not start: {}", e);
                let result = SynthesisResult::interrupted(chairman.id.clone(), "", e.to_string());
                self.log_result(&result);
                return Ok(result);
            }
        };

        let outcome = handle.forward(on_chunk).await;
        let result = match outcome.interruption {
            None => SynthesisResult::complete(chairman.id.clone(), outcome.text),
            Some(reason) => {
                warn!(
                    "Verdict stream interrupted after {} chars: {}",
                    outcome.text.chars().count(),
                    reason
                );
                SynthesisResult::interrupted(chairman.id.clone(), outcome.text, reason)
            }
        };
        self.log_result(&result);
        Ok(result)
    }

    fn classify(chairman: &Node, error: GatewayError) -> SynthesisError {
        if error.is_not_configured() {
            SynthesisError::ChairmanNotReady(chairman.name.clone())
        } else {
            SynthesisError::Gateway(error)
        }
    }

    fn log_result(&self, result: &SynthesisResult) {
        self.logger.log(ConversationEvent::new(
            "synthesis",
            serde_json::json!({
                "chairman_id": result.chairman_id.as_str(),
                "complete": result.is_complete(),
                "completion": result.completion,
                "text": result.text,
            }),
        ));
    }
}
