//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Invalid node definition: {0}")]
    InvalidNode(String),

    #[error("Unknown provider: {0}")]
    UnknownProvider(String),

    #[error("Unknown preset: {0}")]
    UnknownPreset(String),

    #[error("Unknown output format: {0}")]
    UnknownOutputFormat(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_provider_display() {
        let error = DomainError::UnknownProvider("acme".to_string());
        assert_eq!(error.to_string(), "Unknown provider: acme");
    }

    #[test]
    fn test_invalid_query_display() {
        let error = DomainError::InvalidQuery("empty".to_string());
        assert_eq!(error.to_string(), "Invalid query: empty");
    }
}
