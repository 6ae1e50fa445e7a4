//! Prompt context budgeting
//!
//! Any node or transcript content quoted into a new prompt is clipped to a
//! fixed character budget and newline-flattened first, so prompt size stays
//! bounded no matter how long a debate runs. Older or verbose content is
//! deliberately sacrificed for predictable turn latency and cost.
//!
//! # Example
//!
//! ```
//! use council_domain::context::ContextBudget;
//!
//! let budget = ContextBudget::default();
//! assert_eq!(budget.stance_preview_chars(), 200);
//! assert_eq!(budget.transcript_window(), 6);
//! assert_eq!(budget.snippet_chars(), 120);
//! ```

pub mod context_budget;

pub use context_budget::ContextBudget;
