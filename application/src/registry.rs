//! Provider registry: provider id → adapter.
//!
//! The orchestrator resolves adapters here instead of switching on provider
//! names. Registering a new adapter is all it takes to add a provider.

use crate::ports::provider_adapter::{ProviderAdapter, ProviderFailure};
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Clone, Default)]
pub struct ProviderRegistry {
    adapters: HashMap<String, Arc<dyn ProviderAdapter>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an adapter under its own provider id, replacing any previous one.
    pub fn register(&mut self, adapter: Arc<dyn ProviderAdapter>) -> &mut Self {
        self.adapters
            .insert(adapter.provider_id().to_string(), adapter);
        self
    }

    pub fn with(mut self, adapter: Arc<dyn ProviderAdapter>) -> Self {
        self.register(adapter);
        self
    }

    /// Look up the adapter for a provider.
    ///
    /// An unregistered id is a wiring bug, reported as
    /// [`ProviderFailure::Unsupported`] so it still lands in the session log.
    pub fn resolve(&self, provider_id: &str) -> Result<Arc<dyn ProviderAdapter>, ProviderFailure> {
        self.adapters
            .get(provider_id)
            .cloned()
            .ok_or_else(|| ProviderFailure::Unsupported(provider_id.to_string()))
    }

    pub fn contains(&self, provider_id: &str) -> bool {
        self.adapters.contains_key(provider_id)
    }

    /// Registered provider ids, sorted.
    pub fn provider_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.adapters.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("providers", &self.provider_ids())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::provider_adapter::ChatRequest;
    use async_trait::async_trait;
    use chorus_domain::FailureKind;

    // -- Mock ProviderAdapter --------------------------------------------------

    struct MockAdapter {
        id: &'static str,
        reply: &'static str,
    }

    #[async_trait]
    impl ProviderAdapter for MockAdapter {
        fn provider_id(&self) -> &str {
            self.id
        }

        async fn invoke(&self, _request: &ChatRequest) -> Result<String, ProviderFailure> {
            Ok(self.reply.to_string())
        }
    }

    fn mock(id: &'static str, reply: &'static str) -> Arc<dyn ProviderAdapter> {
        Arc::new(MockAdapter { id, reply })
    }

    #[tokio::test]
    async fn resolves_registered_adapter() {
        let registry = ProviderRegistry::new()
            .with(mock("openai", "from openai"))
            .with(mock("cohere", "from cohere"));

        let adapter = registry.resolve("cohere").unwrap();
        let request = ChatRequest::new("command", vec![], "key");
        assert_eq!(adapter.invoke(&request).await.unwrap(), "from cohere");
        assert_eq!(registry.provider_ids(), ["cohere", "openai"]);
    }

    #[test]
    fn unknown_provider_is_unsupported() {
        let registry = ProviderRegistry::new().with(mock("openai", ""));
        let err = registry.resolve("bard").err().unwrap();
        assert_eq!(err.kind(), FailureKind::UnsupportedProvider);
    }

    #[tokio::test]
    async fn later_registration_replaces_earlier() {
        let registry = ProviderRegistry::new()
            .with(mock("openai", "old"))
            .with(mock("openai", "new"));
        let request = ChatRequest::new("gpt-4", vec![], "key");
        let reply = registry.resolve("openai").unwrap().invoke(&request).await;
        assert_eq!(reply.unwrap(), "new");
    }

    #[tokio::test]
    async fn default_probe_reports_error() {
        let adapter = mock("openai", "");
        assert!(!adapter.supports_probe());
        assert_eq!(
            adapter.probe("key").await,
            chorus_domain::CredentialStatus::Error
        );
    }
}
