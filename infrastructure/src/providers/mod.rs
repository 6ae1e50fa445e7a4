//! Provider adapters
//!
//! One [`ProviderAdapter`] per wire protocol. The [`ProviderRegistry`]
//! resolves a node's credential and endpoint and routes the call to the
//! adapter for the node's protocol.

pub mod anthropic;
pub mod gemini;
mod http;
pub mod openai_compat;
pub mod registry;
mod sse;

pub use registry::ProviderRegistry;

use async_trait::async_trait;
use council_application::ports::node_gateway::{GatewayError, StreamHandle};
use council_domain::ProtocolKind;

/// Sampling temperature used for every generation request
pub const TEMPERATURE: f64 = 0.7;

/// A fully resolved generation request.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderRequest {
    /// API base URL without a trailing slash
    pub endpoint: String,
    /// Credential, absent for self-hosted providers without one
    pub api_key: Option<String>,
    pub model: String,
    pub prompt: String,
    pub system: Option<String>,
}

impl ProviderRequest {
    /// The system instruction, if non-empty.
    pub fn system(&self) -> Option<&str> {
        self.system.as_deref().filter(|s| !s.trim().is_empty())
    }
}

/// Adapter for one wire protocol.
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    fn protocol(&self) -> ProtocolKind;

    /// Complete generation.
    async fn generate(&self, request: &ProviderRequest) -> Result<String, GatewayError>;

    /// Streaming generation.
    ///
    /// Errors before the first byte fail the call; errors afterwards arrive
    /// on the stream with the partial text preserved.
    async fn generate_stream(&self, request: ProviderRequest)
    -> Result<StreamHandle, GatewayError>;
}
