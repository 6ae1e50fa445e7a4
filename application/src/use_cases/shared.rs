//! Shared utilities for use cases.
//!
//! Per-node calls with an optional timeout, and classification of gateway
//! failures into sentinel results.

use crate::ports::node_gateway::{GatewayError, NodeGateway};
use council_domain::{CouncilResponse, Node, ResponseStatus};
use std::time::Duration;

/// Map a gateway failure onto the sentinel taxonomy.
pub(crate) fn status_for_error(error: &GatewayError) -> ResponseStatus {
    match error {
        GatewayError::NotConfigured(_) => ResponseStatus::Skipped,
        GatewayError::Unauthorized(_) => ResponseStatus::Unauthorized,
        other => ResponseStatus::Error {
            message: other.to_string(),
        },
    }
}

/// Turn one node's call result into a response, never an error.
pub(crate) fn to_response(node: &Node, result: Result<String, GatewayError>) -> CouncilResponse {
    match result {
        Ok(content) => CouncilResponse::success(node.id.clone(), content),
        Err(e) => CouncilResponse::degraded(node.id.clone(), &node.name, status_for_error(&e)),
    }
}

/// Call `generate`, bounded by `timeout` when one is set.
pub(crate) async fn generate_with_timeout<G: NodeGateway + ?Sized>(
    gateway: &G,
    node: &Node,
    prompt: &str,
    system: Option<&str>,
    timeout: Option<Duration>,
) -> Result<String, GatewayError> {
    match timeout {
        Some(limit) => tokio::time::timeout(limit, gateway.generate(node, prompt, system))
            .await
            .unwrap_or_else(|_| {
                Err(GatewayError::Transport(format!(
                    "timed out after {}s",
                    limit.as_secs()
                )))
            }),
        None => gateway.generate(node, prompt, system).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use council_domain::ProviderKind;

    fn node() -> Node {
        Node::new("a", "Alpha", ProviderKind::OpenAi, "gpt-4o")
    }

    #[test]
    fn test_classification() {
        let r = to_response(&node(), Err(GatewayError::NotConfigured("openai".into())));
        assert_eq!(r.status, ResponseStatus::Skipped);
        assert!(r.content.starts_with("[Skipped] Alpha"));

        let r = to_response(&node(), Err(GatewayError::Unauthorized("401".into())));
        assert_eq!(r.status, ResponseStatus::Unauthorized);

        let r = to_response(
            &node(),
            Err(GatewayError::Http {
                status: 500,
                message: "boom".into(),
            }),
        );
        assert!(matches!(r.status, ResponseStatus::Error { .. }));
        assert_eq!(r.content, "[Error] Alpha: HTTP 500: boom");

        let r = to_response(&node(), Ok("fine".into()));
        assert!(!r.is_degraded());
    }
}
