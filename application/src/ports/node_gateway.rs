//! Node Gateway port
//!
//! Defines the interface for calling a council node's backend.

use async_trait::async_trait;
use council_domain::{Node, StreamEvent};
use thiserror::Error;
use tokio::sync::mpsc;

/// Errors that can occur during gateway operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// No credential for the node's provider
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    /// The provider rejected the credential
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Connection error: {0}")]
    Transport(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Stream error: {0}")]
    Stream(String),

    #[error("Other error: {0}")]
    Other(String),
}

impl GatewayError {
    pub fn is_not_configured(&self) -> bool {
        matches!(self, GatewayError::NotConfigured(_))
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, GatewayError::Unauthorized(_))
    }
}

/// Gateway for node communication
///
/// This port defines how the application layer reaches model providers.
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait NodeGateway: Send + Sync {
    /// Send one prompt and return the whole reply.
    async fn generate(
        &self,
        node: &Node,
        prompt: &str,
        system: Option<&str>,
    ) -> Result<String, GatewayError>;

    /// Send one prompt and stream the reply.
    ///
    /// Default implementation calls `generate()` and wraps the result in a
    /// single `Completed` event.
    async fn generate_stream(
        &self,
        node: &Node,
        prompt: &str,
        system: Option<&str>,
    ) -> Result<StreamHandle, GatewayError> {
        let result = self.generate(node, prompt, system).await?;
        let (tx, rx) = mpsc::channel(1);
        // Receiver may already be gone; nothing to do then
        let _ = tx.send(StreamEvent::Completed(result)).await;
        Ok(StreamHandle::new(rx))
    }
}

/// Outcome of draining a stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamOutcome {
    /// Everything received, complete or not
    pub text: String,
    /// Why the stream stopped early, if it did
    pub interruption: Option<String>,
}

impl StreamOutcome {
    pub fn is_complete(&self) -> bool {
        self.interruption.is_none()
    }
}

/// Handle for receiving streaming events from a node.
///
/// Wraps an `mpsc::Receiver<StreamEvent>` and provides convenience methods
/// for consuming the stream.
pub struct StreamHandle {
    pub receiver: mpsc::Receiver<StreamEvent>,
}

impl StreamHandle {
    pub fn new(receiver: mpsc::Receiver<StreamEvent>) -> Self {
        Self { receiver }
    }

    /// Drain the stream, handing each text fragment to `on_chunk`.
    ///
    /// Only a terminal `Completed` counts as a clean finish. An `Error`
    /// event, or the sender going away first, yields the partial text with
    /// an interruption reason.
    pub async fn forward<F>(mut self, mut on_chunk: F) -> StreamOutcome
    where
        F: FnMut(&str),
    {
        let mut full_text = String::new();
        while let Some(event) = self.receiver.recv().await {
            match event {
                StreamEvent::Delta(chunk) => {
                    on_chunk(&chunk);
                    full_text.push_str(&chunk);
                }
                StreamEvent::Completed(text) => {
                    if full_text.is_empty() && !text.is_empty() {
                        on_chunk(&text);
                        full_text = text;
                    }
                    return StreamOutcome {
                        text: full_text,
                        interruption: None,
                    };
                }
                StreamEvent::Error(e) => {
                    return StreamOutcome {
                        text: full_text,
                        interruption: Some(e),
                    };
                }
            }
        }
        StreamOutcome {
            text: full_text,
            interruption: Some("stream closed before completion".to_string()),
        }
    }

    /// Consume the stream and collect all text into a single string.
    pub async fn collect_text(self) -> Result<String, GatewayError> {
        let outcome = self.forward(|_| {}).await;
        match outcome.interruption {
            None => Ok(outcome.text),
            Some(reason) => Err(GatewayError::Stream(reason)),
        }
    }
}
