//! Debate session controller.
//!
//! One [`DebateController`] owns one session. Every spawned continuation
//! (turn loop, countdown) reads the session through the same shared handle
//! and re-checks the status after each await, so a result that resolves
//! after `end()` is discarded rather than appended.

use super::event::DebateEvent;
use crate::config::DebatePolicy;
use crate::ports::conversation_logger::{ConversationEvent, ConversationLogger};
use crate::ports::node_gateway::{GatewayError, NodeGateway};
use council_domain::{
    CouncilResponse, DebateMessage, DebateSnapshot, DebateStatus, DebateTurnPrompt,
    DurationPolicy, MessageId, Node,
};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{Notify, mpsc, watch};
use tokio::time::{Instant, interval_at};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Operations refused by the debate state machine
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DebateError {
    #[error("Debate already started")]
    NotIdle,

    #[error("Debate has not started")]
    NotStarted,

    #[error("Debate has ended")]
    Ended,

    #[error("No ready nodes to debate")]
    NoSpeakers,

    #[error("Message is empty")]
    EmptyMessage,
}

/// Seed material for a debate
#[derive(Debug, Clone)]
pub struct DebateContext {
    pub query: String,
    /// Full roster, for resolving names
    pub roster: Vec<Node>,
    /// Ready nodes in rotation order
    pub speakers: Vec<Node>,
    /// Round responses quoted as stance previews
    pub stances: Vec<CouncilResponse>,
}

/// Mutable run-state, only touched under the lock
struct Session {
    status: DebateStatus,
    turn_index: usize,
    remaining: Option<u64>,
    transcript: Vec<DebateMessage>,
    next_id: u64,
}

impl Session {
    fn next_message_id(&mut self) -> MessageId {
        let id = MessageId(self.next_id);
        self.next_id += 1;
        id
    }
}

/// A turn taken off the rotation, ready to send
struct PlannedTurn {
    node: Node,
    prompt: DebateTurnPrompt,
}

struct Shared<G> {
    gateway: Arc<G>,
    context: DebateContext,
    policy: DebatePolicy,
    session: Mutex<Session>,
    /// Re-arms the turn loop after resume or a user message
    wake: Notify,
    /// Cancels every pending timer of this session
    cancel: CancellationToken,
    events: mpsc::UnboundedSender<DebateEvent>,
    ended: watch::Sender<bool>,
    logger: Arc<dyn ConversationLogger>,
}

impl<G: NodeGateway + 'static> Shared<G> {
    fn session(&self) -> MutexGuard<'_, Session> {
        self.session
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn emit(&self, event: DebateEvent) {
        // Observer may have gone away
        let _ = self.events.send(event);
    }

    /// Transition to Ended once; later calls return `None`.
    fn end(&self) -> Option<Vec<DebateMessage>> {
        let transcript = {
            let mut session = self.session();
            if session.status == DebateStatus::Ended {
                return None;
            }
            session.status = DebateStatus::Ended;
            self.cancel.cancel();
            let transcript = session.transcript.clone();
            self.emit(DebateEvent::Ended {
                transcript: transcript.clone(),
            });
            transcript
        };
        self.ended.send_replace(true);

        info!("Debate ended with {} messages", transcript.len());
        self.logger.log(ConversationEvent::new(
            "debate_ended",
            serde_json::json!({ "messages": transcript.len() }),
        ));
        Some(transcript)
    }

    /// Sleep for `delay`, cut short by a wake-up (then `rearm_delay`).
    ///
    /// Returns false once the session is cancelled.
    async fn wait(&self, delay: Duration) -> bool {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => false,
            _ = self.wake.notified() => {
                tokio::select! {
                    biased;
                    _ = self.cancel.cancelled() => false,
                    _ = tokio::time::sleep(self.policy.rearm_delay) => true,
                }
            }
            _ = tokio::time::sleep(delay) => true,
        }
    }

    fn plan_turn(&self, session: &Session) -> PlannedTurn {
        let speakers = &self.context.speakers;
        let node = speakers[session.turn_index % speakers.len()].clone();
        let prompt = DebateTurnPrompt::build(
            &self.context.query,
            &node,
            &self.context.roster,
            &self.context.stances,
            &session.transcript,
            session.turn_index,
            &self.policy.budget,
        );
        self.emit(DebateEvent::TurnStarted {
            node: node.id.clone(),
            turn: session.turn_index,
        });
        PlannedTurn { node, prompt }
    }

    /// Append a node's reply, holding it while paused.
    ///
    /// Returns false when the session ended first and the reply was dropped.
    async fn commit(&self, node: &Node, text: String) -> bool {
        loop {
            {
                let mut session = self.session();
                let status = session.status;
                match status {
                    DebateStatus::Running => {
                        let id = session.next_message_id();
                        let message = DebateMessage::from_node(id, &node.id, text);
                        session.transcript.push(message.clone());
                        session.turn_index += 1;
                        self.emit(DebateEvent::MessageAppended(message.clone()));
                        drop(session);
                        self.log_message(&message);
                        return true;
                    }
                    DebateStatus::Paused => {}
                    DebateStatus::Idle | DebateStatus::Ended => {
                        debug!("Discarding late turn from {}", node.id);
                        return false;
                    }
                }
            }
            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {}
                _ = self.wake.notified() => {}
                _ = tokio::time::sleep(self.policy.pause_poll) => {}
            }
        }
    }

    /// Record a failed turn and move the rotation on.
    fn absorb_failure(&self, node: &Node, error: GatewayError) -> bool {
        let mut session = self.session();
        if session.status == DebateStatus::Ended {
            return false;
        }
        warn!("Debate turn by {} failed: {}", node.id, error);
        session.turn_index += 1;
        self.emit(DebateEvent::TurnFailed {
            node: node.id.clone(),
            error: error.to_string(),
        });
        true
    }

    fn log_message(&self, message: &DebateMessage) {
        self.logger.log(ConversationEvent::new(
            "debate_message",
            serde_json::json!({
                "id": message.id.0,
                "speaker": message.speaker,
                "content": message.content,
            }),
        ));
    }
}

/// Sequential turn loop: at most one generate call in flight.
async fn run_turns<G: NodeGateway + 'static>(shared: Arc<Shared<G>>) {
    let mut delay = shared.policy.first_turn_delay;
    loop {
        if !shared.wait(delay).await {
            return;
        }

        let turn = {
            let session = shared.session();
            match session.status {
                DebateStatus::Running => shared.plan_turn(&session),
                DebateStatus::Paused => {
                    delay = shared.policy.pause_poll;
                    continue;
                }
                DebateStatus::Idle | DebateStatus::Ended => return,
            }
        };

        let result = shared
            .gateway
            .generate(&turn.node, &turn.prompt.prompt, Some(&turn.prompt.system))
            .await;
        let still_active = match result {
            Ok(text) => shared.commit(&turn.node, text).await,
            Err(e) => shared.absorb_failure(&turn.node, e),
        };
        if !still_active {
            return;
        }
        delay = shared.policy.turn_delay;
    }
}

/// Countdown, independent of the turn loop. Keeps running while paused.
async fn run_countdown<G: NodeGateway + 'static>(shared: Arc<Shared<G>>) {
    let tick = shared.policy.tick;
    let mut interval = interval_at(Instant::now() + tick, tick);
    loop {
        tokio::select! {
            biased;
            _ = shared.cancel.cancelled() => return,
            _ = interval.tick() => {}
        }
        let remaining = {
            let mut session = shared.session();
            if session.status == DebateStatus::Ended {
                return;
            }
            let left = session.remaining.unwrap_or(0).saturating_sub(1);
            session.remaining = Some(left);
            shared.emit(DebateEvent::Tick { remaining: left });
            left
        };
        if remaining == 0 {
            debug!("Countdown elapsed");
            shared.end();
            return;
        }
    }
}

/// Controller for one debate session
pub struct DebateController<G: NodeGateway + 'static> {
    shared: Arc<Shared<G>>,
}

impl<G: NodeGateway + 'static> DebateController<G> {
    /// Create an idle session and the channel its events arrive on.
    pub fn new(
        gateway: Arc<G>,
        context: DebateContext,
        policy: DebatePolicy,
        logger: Arc<dyn ConversationLogger>,
    ) -> (Self, mpsc::UnboundedReceiver<DebateEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        let (ended, _) = watch::channel(false);
        let shared = Arc::new(Shared {
            gateway,
            context,
            policy,
            session: Mutex::new(Session {
                status: DebateStatus::Idle,
                turn_index: 0,
                remaining: None,
                transcript: Vec::new(),
                next_id: 0,
            }),
            wake: Notify::new(),
            cancel: CancellationToken::new(),
            events,
            ended,
            logger,
        });
        (Self { shared }, rx)
    }

    /// Idle → Running. Schedules the first turn and, for a fixed duration,
    /// the countdown.
    pub fn start(&self, duration: DurationPolicy) -> Result<(), DebateError> {
        {
            let mut session = self.shared.session();
            let status = session.status;
            match status {
                DebateStatus::Idle => {}
                DebateStatus::Ended => return Err(DebateError::Ended),
                DebateStatus::Running | DebateStatus::Paused => return Err(DebateError::NotIdle),
            }
            if self.shared.context.speakers.is_empty() {
                return Err(DebateError::NoSpeakers);
            }
            session.status = DebateStatus::Running;
            session.remaining = duration.seconds();
            self.shared.emit(DebateEvent::Started { policy: duration });
        }

        info!(
            "Debate started: {} speakers, duration {}",
            self.shared.context.speakers.len(),
            duration
        );
        tokio::spawn(run_turns(Arc::clone(&self.shared)));
        if duration.seconds().is_some() {
            tokio::spawn(run_countdown(Arc::clone(&self.shared)));
        }
        Ok(())
    }

    /// Running → Paused. Turn position and transcript are kept.
    pub fn pause(&self) -> Result<(), DebateError> {
        let mut session = self.shared.session();
        let status = session.status;
        match status {
            DebateStatus::Running => {
                session.status = DebateStatus::Paused;
                self.shared.emit(DebateEvent::Paused);
                Ok(())
            }
            DebateStatus::Paused => Ok(()),
            DebateStatus::Idle => Err(DebateError::NotStarted),
            DebateStatus::Ended => Err(DebateError::Ended),
        }
    }

    /// Paused → Running, re-arming the next turn.
    pub fn resume(&self) -> Result<(), DebateError> {
        {
            let mut session = self.shared.session();
            let status = session.status;
            match status {
                DebateStatus::Paused => {
                    session.status = DebateStatus::Running;
                    self.shared.emit(DebateEvent::Resumed);
                }
                DebateStatus::Running => return Ok(()),
                DebateStatus::Idle => return Err(DebateError::NotStarted),
                DebateStatus::Ended => return Err(DebateError::Ended),
            }
        }
        self.shared.wake.notify_one();
        Ok(())
    }

    /// Append a user message out of turn order.
    ///
    /// Unpauses a paused session and re-arms the next node turn so the
    /// council reacts promptly.
    pub fn inject_user_message(&self, text: &str) -> Result<MessageId, DebateError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(DebateError::EmptyMessage);
        }

        let message = {
            let mut session = self.shared.session();
            let status = session.status;
            match status {
                DebateStatus::Running => {}
                DebateStatus::Paused => {
                    session.status = DebateStatus::Running;
                    self.shared.emit(DebateEvent::Resumed);
                }
                DebateStatus::Idle => return Err(DebateError::NotStarted),
                DebateStatus::Ended => return Err(DebateError::Ended),
            }
            let id = session.next_message_id();
            let message = DebateMessage::from_user(id, text);
            session.transcript.push(message.clone());
            self.shared
                .emit(DebateEvent::MessageAppended(message.clone()));
            message
        };

        self.shared.log_message(&message);
        self.shared.wake.notify_one();
        Ok(message.id)
    }

    /// Running|Paused → Ended. Idempotent: only the first call returns the
    /// transcript and emits `Ended`.
    pub fn end(&self) -> Option<Vec<DebateMessage>> {
        self.shared.end()
    }

    pub fn status(&self) -> DebateStatus {
        self.shared.session().status
    }

    pub fn transcript(&self) -> Vec<DebateMessage> {
        self.shared.session().transcript.clone()
    }

    pub fn snapshot(&self) -> DebateSnapshot {
        let session = self.shared.session();
        DebateSnapshot {
            status: session.status,
            turn_index: session.turn_index,
            remaining_secs: session.remaining,
            transcript: session.transcript.clone(),
        }
    }

    /// Wait until the session has ended, by any path, and return the
    /// final transcript.
    pub async fn wait_ended(&self) -> Vec<DebateMessage> {
        let mut rx = self.shared.ended.subscribe();
        // The sender lives in `shared`, so this only errors if it is dropped
        let _ = rx.wait_for(|ended| *ended).await;
        self.transcript()
    }
}

impl<G: NodeGateway + 'static> Drop for DebateController<G> {
    fn drop(&mut self) {
        if self.status().is_live() {
            self.shared.end();
        }
    }
}
