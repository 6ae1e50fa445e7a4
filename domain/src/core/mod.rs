//! Core domain concepts shared across all subdomains.
//!
//! - [`question::Query`]: a validated query to pose to the council
//! - [`error::DomainError`]: domain-level errors
//! - [`string`]: character-budget helpers used when quoting content into prompts

pub mod error;
pub mod question;
pub mod string;
