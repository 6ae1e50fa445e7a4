//! Infrastructure layer for llm-council
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod logging;
pub mod providers;
pub mod verification;

// Re-export commonly used types
pub use config::{
    ConfigError, ConfigIssue, ConfigLoader, CouncilSettings, FileConfig, Severity,
};
pub use logging::JsonlConversationLogger;
pub use providers::{ProviderAdapter, ProviderRegistry, ProviderRequest};
pub use verification::HttpKeyVerifier;
