//! Scripted gateway shared by use case tests.

use crate::ports::conversation_logger::{ConversationEvent, ConversationLogger};
use crate::ports::node_gateway::{GatewayError, NodeGateway, StreamHandle};
use async_trait::async_trait;
use council_domain::{Node, ProviderKind, StreamEvent};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::mpsc;

/// A scripted reply for one `generate` call
#[derive(Debug, Clone)]
pub(crate) enum Reply {
    Text(String),
    Fail(GatewayError),
    /// Reply after a delay (virtual time under a paused clock)
    Slow(Duration, String),
}

#[derive(Debug, Clone)]
pub(crate) struct Call {
    pub node: String,
    pub prompt: String,
    pub system: Option<String>,
}

/// Gateway returning scripted replies per node id.
///
/// Unscripted calls answer `"<node> reply <n>"`, counting from 1 per node.
#[derive(Default)]
pub(crate) struct ScriptedGateway {
    replies: Mutex<HashMap<String, VecDeque<Reply>>>,
    fallback: Mutex<HashMap<String, Reply>>,
    streams: Mutex<HashMap<String, Vec<StreamEvent>>>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a one-shot reply for `node`.
    pub fn with_reply(self, node: &str, reply: Reply) -> Self {
        self.replies
            .lock()
            .unwrap()
            .entry(node.to_string())
            .or_default()
            .push_back(reply);
        self
    }

    /// Reply used for `node` once its queue is empty.
    pub fn with_fallback(self, node: &str, reply: Reply) -> Self {
        self.fallback
            .lock()
            .unwrap()
            .insert(node.to_string(), reply);
        self
    }

    /// Events sent, in order, by `generate_stream` for `node`; the sender
    /// is dropped afterwards.
    pub fn with_stream(self, node: &str, events: Vec<StreamEvent>) -> Self {
        self.streams
            .lock()
            .unwrap()
            .insert(node.to_string(), events);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, node: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.node == node)
            .count()
    }

    fn next_reply(&self, node: &str) -> Reply {
        if let Some(reply) = self
            .replies
            .lock()
            .unwrap()
            .get_mut(node)
            .and_then(|q| q.pop_front())
        {
            return reply;
        }
        if let Some(reply) = self.fallback.lock().unwrap().get(node) {
            return reply.clone();
        }
        Reply::Text(format!("{} reply {}", node, self.call_count(node)))
    }
}

#[async_trait]
impl NodeGateway for ScriptedGateway {
    async fn generate(
        &self,
        node: &Node,
        prompt: &str,
        system: Option<&str>,
    ) -> Result<String, GatewayError> {
        self.calls.lock().unwrap().push(Call {
            node: node.id.to_string(),
            prompt: prompt.to_string(),
            system: system.map(str::to_string),
        });
        match self.next_reply(node.id.as_str()) {
            Reply::Text(t) => Ok(t),
            Reply::Fail(e) => Err(e),
            Reply::Slow(delay, t) => {
                tokio::time::sleep(delay).await;
                Ok(t)
            }
        }
    }

    async fn generate_stream(
        &self,
        node: &Node,
        prompt: &str,
        system: Option<&str>,
    ) -> Result<StreamHandle, GatewayError> {
        let scripted = self.streams.lock().unwrap().remove(node.id.as_str());
        let Some(events) = scripted else {
            let text = self.generate(node, prompt, system).await?;
            let (tx, rx) = mpsc::channel(1);
            let _ = tx.send(StreamEvent::Completed(text)).await;
            return Ok(StreamHandle::new(rx));
        };
        self.calls.lock().unwrap().push(Call {
            node: node.id.to_string(),
            prompt: prompt.to_string(),
            system: system.map(str::to_string),
        });
        let (tx, rx) = mpsc::channel(events.len().max(1));
        for event in events {
            let _ = tx.send(event).await;
        }
        Ok(StreamHandle::new(rx))
    }
}

/// Logger capturing event types and payloads.
#[derive(Default)]
pub(crate) struct RecordingLogger {
    pub events: Mutex<Vec<(String, serde_json::Value)>>,
}

impl RecordingLogger {
    pub fn types(&self) -> Vec<String> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .map(|(t, _)| t.clone())
            .collect()
    }
}

impl ConversationLogger for RecordingLogger {
    fn log(&self, event: ConversationEvent) {
        self.events
            .lock()
            .unwrap()
            .push((event.event_type.to_string(), event.payload));
    }
}

pub(crate) fn node(id: &str) -> Node {
    Node::new(id, format!("Node {}", id.to_uppercase()), ProviderKind::OpenAi, "gpt-4o")
}

pub(crate) fn local_node(id: &str) -> Node {
    Node::new(id, format!("Local {}", id.to_uppercase()), ProviderKind::Ollama, "llama3")
}
