//! Presentation layer for llm-council
//!
//! This crate contains the CLI definition, output formatters, progress
//! reporters, and the live debate terminal interface.

pub mod cli;
pub mod debate;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use cli::commands::{Cli, OutputFormat};
pub use debate::{DebateCommand, DebatePrinter};
pub use output::console::ConsoleFormatter;
pub use output::formatter::OutputFormatter;
pub use progress::reporter::{ProgressReporter, SimpleProgress};
