//! Character budgets for quoting content into prompts.
//!
//! [`ContextBudget`] caps each quoted section of a debate turn prompt and of
//! the synthesis context:
//!
//! - `stance_preview_chars`: per-node preview of its round position
//! - `transcript_window`: how many trailing transcript messages a turn sees
//! - `snippet_chars`: per-message cap inside that window
//! - `synthesis_entry_chars`: per-entry cap in the chairman context

use crate::core::string::clip;
use serde::{Deserialize, Serialize};

/// Budget controlling how much quoted content enters a prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextBudget {
    stance_preview_chars: usize,
    transcript_window: usize,
    snippet_chars: usize,
    synthesis_entry_chars: usize,
}

impl ContextBudget {
    pub const DEFAULT_STANCE_PREVIEW_CHARS: usize = 200;
    pub const DEFAULT_TRANSCRIPT_WINDOW: usize = 6;
    pub const DEFAULT_SNIPPET_CHARS: usize = 120;
    pub const DEFAULT_SYNTHESIS_ENTRY_CHARS: usize = 4_000;

    /// Create a new budget with explicit values.
    pub fn new(
        stance_preview_chars: usize,
        transcript_window: usize,
        snippet_chars: usize,
        synthesis_entry_chars: usize,
    ) -> Self {
        Self {
            stance_preview_chars,
            transcript_window,
            snippet_chars,
            synthesis_entry_chars,
        }
    }

    pub fn stance_preview_chars(&self) -> usize {
        self.stance_preview_chars
    }

    pub fn transcript_window(&self) -> usize {
        self.transcript_window
    }

    pub fn snippet_chars(&self) -> usize {
        self.snippet_chars
    }

    pub fn synthesis_entry_chars(&self) -> usize {
        self.synthesis_entry_chars
    }

    /// Clip a node's round response down to its stance preview.
    pub fn stance_preview(&self, content: &str) -> String {
        clip(content, self.stance_preview_chars)
    }

    /// Clip one transcript message for the turn window.
    pub fn snippet(&self, content: &str) -> String {
        clip(content, self.snippet_chars)
    }

    /// Clip one entry of the synthesis context.
    pub fn synthesis_entry(&self, content: &str) -> String {
        clip(content, self.synthesis_entry_chars)
    }

    /// The trailing window of a transcript that a turn prompt may quote.
    pub fn window<'a, T>(&self, transcript: &'a [T]) -> &'a [T] {
        let start = transcript.len().saturating_sub(self.transcript_window);
        &transcript[start..]
    }

    /// Upper bound (in chars) of the quoted sections of a turn prompt,
    /// excluding fixed framing text and speaker labels.
    pub fn max_quoted_chars(&self, stance_count: usize) -> usize {
        stance_count * self.stance_preview_chars + self.transcript_window * self.snippet_chars
    }
}

impl Default for ContextBudget {
    fn default() -> Self {
        Self {
            stance_preview_chars: Self::DEFAULT_STANCE_PREVIEW_CHARS,
            transcript_window: Self::DEFAULT_TRANSCRIPT_WINDOW,
            snippet_chars: Self::DEFAULT_SNIPPET_CHARS,
            synthesis_entry_chars: Self::DEFAULT_SYNTHESIS_ENTRY_CHARS,
        }
    }
}
