//! Verify Keys use case
//!
//! Probes every configured credential concurrently.

use crate::ports::key_verifier::{KeyValidity, KeyVerifier};
use council_domain::{CredentialSet, ProviderKind};
use futures::future::join_all;
use std::sync::Arc;
use tracing::info;

pub struct VerifyKeysUseCase<V: KeyVerifier + ?Sized> {
    verifier: Arc<V>,
}

impl<V: KeyVerifier + ?Sized> VerifyKeysUseCase<V> {
    pub fn new(verifier: Arc<V>) -> Self {
        Self { verifier }
    }

    /// One result per configured provider, in catalogue order.
    pub async fn execute(&self, credentials: &CredentialSet) -> Vec<(ProviderKind, KeyValidity)> {
        let probes = credentials.configured_providers().into_iter().filter_map(|provider| {
            let key = credentials.get(provider)?.to_string();
            let verifier = Arc::clone(&self.verifier);
            Some(async move { (provider, verifier.verify(provider, &key).await) })
        });
        let results = join_all(probes).await;
        info!(
            "Verified {} keys, {} valid",
            results.len(),
            results.iter().filter(|(_, v)| v.is_valid()).count()
        );
        results
    }
}
