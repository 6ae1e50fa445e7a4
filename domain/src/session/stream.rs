//! Streaming events for incremental model output.
//!
//! [`StreamEvent`] represents individual events in a streaming response,
//! enabling real-time display of a verdict as it's generated.
//!
//! A stream is complete only when it ends with [`StreamEvent::Completed`].
//! An [`StreamEvent::Error`], or a channel that closes without a terminal
//! event, means the text received so far is partial.

/// An event in a streaming model response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// A text chunk from the model.
    Delta(String),
    /// The complete response text (signals stream end).
    Completed(String),
    /// An error that occurred during streaming.
    Error(String),
}

impl StreamEvent {
    /// Returns the text content if this is a Delta or Completed event.
    pub fn text(&self) -> Option<&str> {
        match self {
            StreamEvent::Delta(s) | StreamEvent::Completed(s) => Some(s),
            StreamEvent::Error(_) => None,
        }
    }

    /// Returns true if this event signals the end of the stream.
    pub fn is_terminal(&self) -> bool {
        matches!(self, StreamEvent::Completed(_) | StreamEvent::Error(_))
    }
}
