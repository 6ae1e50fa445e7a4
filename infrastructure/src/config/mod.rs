//! Configuration loading for llm-council
//!
//! This module handles file I/O and merging of configuration from multiple
//! sources. The priority order (highest to lowest):
//!
//! 1. `COUNCIL_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./council.toml` or `./.council.toml`
//! 4. Global: `$XDG_CONFIG_HOME/llm-council/config.toml`
//! 5. Default values
//!
//! Provider keys missing from every source fall back to the providers'
//! well-known environment variables.

mod file_config;
mod loader;
mod settings;

pub use file_config::{
    ConfigIssue, FileConfig, FileContextBudgetConfig, FileCouncilConfig, FileCredentialsConfig,
    FileDebateConfig, FileLoggingConfig, FileNodeConfig, FileOutputConfig, FileRoundConfig,
    Severity,
};
pub use loader::ConfigLoader;
pub use settings::{ConfigError, CouncilSettings};
