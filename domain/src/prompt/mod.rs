//! Prompt domain
//!
//! Templates for each phase of a council run, plus the bounded per-turn
//! debate prompt.

mod debate;
mod template;

pub use debate::DebateTurnPrompt;
pub use template::PromptTemplate;
