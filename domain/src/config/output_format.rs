//! Output format value object

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How a finished council run is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Round responses, reviews, transcript and verdict
    #[default]
    Full,
    /// Only the chairman's verdict
    Synthesis,
    /// The whole council record as JSON
    Json,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Full => "full",
            OutputFormat::Synthesis => "synthesis",
            OutputFormat::Json => "json",
        }
    }

    /// Whether live progress (streamed verdict, debate lines) goes to stdout.
    pub fn is_interactive(&self) -> bool {
        !matches!(self, OutputFormat::Json)
    }
}

impl FromStr for OutputFormat {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "full" => Ok(OutputFormat::Full),
            "synthesis" | "verdict" => Ok(OutputFormat::Synthesis),
            "json" => Ok(OutputFormat::Json),
            other => Err(DomainError::UnknownOutputFormat(other.to_string())),
        }
    }
}
