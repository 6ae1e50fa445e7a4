//! Provider registry: routes node calls to the adapter for their protocol.

use super::anthropic::AnthropicAdapter;
use super::gemini::GeminiAdapter;
use super::http::build_client;
use super::openai_compat::OpenAiCompatibleAdapter;
use super::{ProviderAdapter, ProviderRequest};
use async_trait::async_trait;
use council_application::ports::node_gateway::{GatewayError, NodeGateway, StreamHandle};
use council_domain::{CredentialSet, Node, ProtocolKind};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// [`NodeGateway`] implementation over the registered provider adapters.
///
/// Holds the credential snapshot for one orchestration run.
pub struct ProviderRegistry {
    adapters: HashMap<ProtocolKind, Arc<dyn ProviderAdapter>>,
    credentials: CredentialSet,
}

impl ProviderRegistry {
    /// Registry with the built-in adapters sharing one HTTP client.
    pub fn new(credentials: CredentialSet) -> Self {
        let client = build_client();
        Self::empty(credentials)
            .with_adapter(Arc::new(OpenAiCompatibleAdapter::new(client.clone())))
            .with_adapter(Arc::new(AnthropicAdapter::new(client.clone())))
            .with_adapter(Arc::new(GeminiAdapter::new(client)))
    }

    /// Registry with no adapters.
    pub fn empty(credentials: CredentialSet) -> Self {
        Self {
            adapters: HashMap::new(),
            credentials,
        }
    }

    /// Register an adapter, replacing any previous one for its protocol.
    pub fn with_adapter(mut self, adapter: Arc<dyn ProviderAdapter>) -> Self {
        self.adapters.insert(adapter.protocol(), adapter);
        self
    }

    pub fn credentials(&self) -> &CredentialSet {
        &self.credentials
    }

    /// Resolve adapter, endpoint and credential for a node.
    fn resolve(
        &self,
        node: &Node,
        prompt: &str,
        system: Option<&str>,
    ) -> Result<(&dyn ProviderAdapter, ProviderRequest), GatewayError> {
        if !self.credentials.is_ready(node) {
            return Err(GatewayError::NotConfigured(
                node.provider.display_name().to_string(),
            ));
        }
        let protocol = node.provider.protocol();
        let adapter = self.adapters.get(&protocol).ok_or_else(|| {
            GatewayError::NotConfigured(format!("no adapter for {:?}", protocol))
        })?;

        let request = ProviderRequest {
            endpoint: node.endpoint(),
            api_key: self.credentials.get(node.provider).map(str::to_string),
            model: node.model_id.clone(),
            prompt: prompt.to_string(),
            system: system.map(str::to_string),
        };
        debug!(node = %node.id, provider = %node.provider, "Routing to {:?} adapter", protocol);
        Ok((adapter.as_ref(), request))
    }
}

#[async_trait]
impl NodeGateway for ProviderRegistry {
    async fn generate(
        &self,
        node: &Node,
        prompt: &str,
        system: Option<&str>,
    ) -> Result<String, GatewayError> {
        let (adapter, request) = self.resolve(node, prompt, system)?;
        adapter.generate(&request).await
    }

    async fn generate_stream(
        &self,
        node: &Node,
        prompt: &str,
        system: Option<&str>,
    ) -> Result<StreamHandle, GatewayError> {
        let (adapter, request) = self.resolve(node, prompt, system)?;
        adapter.generate_stream(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use council_domain::{ProviderKind, StreamEvent};
    use std::sync::Mutex;
    use tokio::sync::mpsc;

    /// Adapter echoing the resolved request back as text.
    struct EchoAdapter {
        protocol: ProtocolKind,
        seen: Mutex<Vec<ProviderRequest>>,
    }

    impl EchoAdapter {
        fn new(protocol: ProtocolKind) -> Arc<Self> {
            Arc::new(Self {
                protocol,
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl ProviderAdapter for EchoAdapter {
        fn protocol(&self) -> ProtocolKind {
            self.protocol
        }

        async fn generate(&self, request: &ProviderRequest) -> Result<String, GatewayError> {
            self.seen.lock().unwrap().push(request.clone());
            Ok(format!("{:?}:{}", self.protocol, request.model))
        }

        async fn generate_stream(
            &self,
            request: ProviderRequest,
        ) -> Result<StreamHandle, GatewayError> {
            let (tx, rx) = mpsc::channel(4);
            tx.send(StreamEvent::Delta(request.model.clone())).await.unwrap();
            tx.send(StreamEvent::Completed(request.model)).await.unwrap();
            Ok(StreamHandle::new(rx))
        }
    }

    #[tokio::test]
    async fn test_unready_node_is_not_configured() {
        let registry = ProviderRegistry::empty(CredentialSet::new())
            .with_adapter(EchoAdapter::new(ProtocolKind::OpenAiCompatible));
        let node = Node::new("g", "Groq", ProviderKind::Groq, "llama3");

        let err = registry.generate(&node, "hi", None).await.unwrap_err();
        assert!(err.is_not_configured());
    }

    #[tokio::test]
    async fn test_routes_by_protocol_with_credential_and_endpoint() {
        let compat = EchoAdapter::new(ProtocolKind::OpenAiCompatible);
        let anthropic = EchoAdapter::new(ProtocolKind::Anthropic);
        let registry = ProviderRegistry::empty(
            CredentialSet::new()
                .with_key(ProviderKind::Groq, "gsk")
                .with_key(ProviderKind::Anthropic, "sk-ant"),
        )
        .with_adapter(compat.clone())
        .with_adapter(anthropic.clone());

        let groq = Node::new("g", "Groq", ProviderKind::Groq, "llama3")
            .with_base_url("https://proxy.example/v1/");
        let claude = Node::new("c", "Claude", ProviderKind::Anthropic, "claude-3");

        assert_eq!(
            registry.generate(&groq, "hi", Some("sys")).await.unwrap(),
            "OpenAiCompatible:llama3"
        );
        assert_eq!(
            registry.generate(&claude, "hi", None).await.unwrap(),
            "Anthropic:claude-3"
        );

        let seen = compat.seen.lock().unwrap();
        assert_eq!(seen[0].endpoint, "https://proxy.example/v1");
        assert_eq!(seen[0].api_key.as_deref(), Some("gsk"));
        assert_eq!(seen[0].system.as_deref(), Some("sys"));
        assert_eq!(anthropic.seen.lock().unwrap()[0].api_key.as_deref(), Some("sk-ant"));
    }

    #[tokio::test]
    async fn test_local_node_ready_without_key() {
        let compat = EchoAdapter::new(ProtocolKind::OpenAiCompatible);
        let registry =
            ProviderRegistry::empty(CredentialSet::new()).with_adapter(compat.clone());
        let local = Node::new("o", "Local", ProviderKind::Ollama, "llama3");

        let outcome = registry
            .generate_stream(&local, "hi", None)
            .await
            .unwrap()
            .forward(|_| {})
            .await;
        assert!(outcome.is_complete());
        assert_eq!(outcome.text, "llama3");
        assert!(compat.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_adapter_is_not_configured() {
        let registry = ProviderRegistry::empty(
            CredentialSet::new().with_key(ProviderKind::Google, "AIza"),
        );
        let node = Node::new("a", "Alpha", ProviderKind::Google, "gemini");
        assert!(registry.generate(&node, "hi", None).await.unwrap_err().is_not_configured());
    }
}
