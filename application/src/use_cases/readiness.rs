//! Readiness filter
//!
//! Decides which nodes are callable: a credential is present for the node's
//! provider, or the provider is a local kind that needs none. Readiness is
//! presence only; see [`VerifyKeysUseCase`](super::verify_keys::VerifyKeysUseCase)
//! for a live probe.

use super::run_round::RoundError;
use council_domain::{CredentialSet, Node};

/// Filters a roster against the active credential set
pub struct ReadinessFilter<'a> {
    credentials: &'a CredentialSet,
}

impl<'a> ReadinessFilter<'a> {
    pub fn new(credentials: &'a CredentialSet) -> Self {
        Self { credentials }
    }

    pub fn is_ready(&self, node: &Node) -> bool {
        self.credentials.is_ready(node)
    }

    /// Ready nodes, in roster order.
    pub fn ready_members(&self, roster: &[Node]) -> Vec<Node> {
        roster
            .iter()
            .filter(|n| self.is_ready(n))
            .cloned()
            .collect()
    }

    /// Nodes that will be skipped, in roster order.
    pub fn unready_members(&self, roster: &[Node]) -> Vec<Node> {
        roster
            .iter()
            .filter(|n| !self.is_ready(n))
            .cloned()
            .collect()
    }
}

/// Refuse a round that cannot gather enough independent opinions.
pub fn ensure_quorum(ready: usize, required: usize) -> Result<(), RoundError> {
    if ready == 0 {
        return Err(RoundError::NoReadyNodes);
    }
    if ready < required {
        return Err(RoundError::InsufficientNodes { ready, required });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::test_support::{local_node, node};
    use council_domain::ProviderKind;

    #[test]
    fn test_ready_members_preserve_order() {
        let roster = vec![node("a"), local_node("b"), node("c")];
        let creds = CredentialSet::new().with_key(ProviderKind::OpenAi, "sk-test");
        let filter = ReadinessFilter::new(&creds);
        let ids: Vec<_> = filter
            .ready_members(&roster)
            .into_iter()
            .map(|n| n.id.to_string())
            .collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert!(filter.unready_members(&roster).is_empty());
    }

    #[test]
    fn test_local_nodes_ready_without_credentials() {
        let roster = vec![node("a"), local_node("b")];
        let creds = CredentialSet::new();
        let filter = ReadinessFilter::new(&creds);
        let ready = filter.ready_members(&roster);
        assert_eq!(ready.len(), 1);
        assert_eq!(ready[0].id.as_str(), "b");
        assert_eq!(filter.unready_members(&roster)[0].id.as_str(), "a");
    }

    #[test]
    fn test_ensure_quorum() {
        assert_eq!(ensure_quorum(0, 2), Err(RoundError::NoReadyNodes));
        assert_eq!(
            ensure_quorum(1, 2),
            Err(RoundError::InsufficientNodes {
                ready: 1,
                required: 2
            })
        );
        assert!(ensure_quorum(2, 2).is_ok());
        assert!(ensure_quorum(1, 1).is_ok());
    }
}
