//! Server-sent event pump.
//!
//! Decodes an SSE response body into [`StreamEvent`]s on a [`StreamHandle`]
//! channel. Each adapter supplies a frame parser that turns one `data:`
//! payload into a [`Frame`].

use council_application::ports::node_gateway::StreamHandle;
use council_domain::StreamEvent;
use eventsource_stream::Eventsource;
use futures::StreamExt;
use reqwest::Response;
use tokio::sync::mpsc;
use tracing::{debug, trace};

/// Channel capacity between the pump and the consumer
const STREAM_BUFFER: usize = 64;

/// Meaning of one SSE `data:` payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Frame {
    /// Incremental text
    Delta(String),
    /// End-of-stream marker
    Done,
    /// Provider-reported failure inside the stream
    Error(String),
    /// Keep-alive, metadata, or a payload that did not parse
    Skip,
}

/// How a well-formed stream signals its end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Termination {
    /// The provider always sends an end marker; a body that stops before
    /// it was cut off.
    Marker,
    /// The end of the body is the end of the stream.
    EndOfBody,
}

/// Spawn a task pumping the response body into a stream handle.
///
/// With [`Termination::Marker`], a body that ends before [`Frame::Done`]
/// is reported as an interruption with the text received so far.
pub(crate) fn pump(
    response: Response,
    parse: fn(&str) -> Frame,
    termination: Termination,
) -> StreamHandle {
    let (tx, rx) = mpsc::channel(STREAM_BUFFER);
    tokio::spawn(async move {
        let mut events = response.bytes_stream().eventsource();
        let mut text = String::new();

        while let Some(event) = events.next().await {
            let event = match event {
                Ok(event) => event,
                Err(e) => {
                    debug!("SSE transport error after {} chars: {}", text.len(), e);
                    let _ = tx.send(StreamEvent::Error(e.to_string())).await;
                    return;
                }
            };
            trace!("SSE frame: {}", event.data);

            match parse(&event.data) {
                Frame::Delta(chunk) => {
                    if chunk.is_empty() {
                        continue;
                    }
                    text.push_str(&chunk);
                    if tx.send(StreamEvent::Delta(chunk)).await.is_err() {
                        return;
                    }
                }
                Frame::Done => {
                    let _ = tx.send(StreamEvent::Completed(text)).await;
                    return;
                }
                Frame::Error(message) => {
                    let _ = tx.send(StreamEvent::Error(message)).await;
                    return;
                }
                Frame::Skip => {}
            }
        }

        let last = match termination {
            Termination::EndOfBody => StreamEvent::Completed(text),
            Termination::Marker => {
                debug!("SSE body closed without end marker after {} chars", text.len());
                StreamEvent::Error("stream closed before completion".to_string())
            }
        };
        let _ = tx.send(last).await;
    });
    StreamHandle::new(rx)
}

/// Parse a payload as JSON, skipping malformed frames.
pub(crate) fn parse_json(data: &str) -> Option<serde_json::Value> {
    serde_json::from_str(data.trim()).ok()
}
