//! Key verification port
//!
//! A live, minimal-cost probe confirming a credential is accepted by its
//! provider. Distinct from readiness, which only checks presence.

use async_trait::async_trait;
use council_domain::ProviderKind;

/// Result of probing a credential
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyValidity {
    Valid,
    Invalid,
}

impl KeyValidity {
    pub fn is_valid(&self) -> bool {
        matches!(self, KeyValidity::Valid)
    }
}

/// Probe a provider with a key.
///
/// Implementations never fail: network and parse errors map to
/// [`KeyValidity::Invalid`].
#[async_trait]
pub trait KeyVerifier: Send + Sync {
    async fn verify(&self, provider: ProviderKind, key: &str) -> KeyValidity;
}
