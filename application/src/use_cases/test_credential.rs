//! Test credential use case
//!
//! Probes a provider with a candidate secret. Never touches session state
//! or the credential store.

use crate::config::BehaviorConfig;
use crate::registry::ProviderRegistry;
use chorus_domain::CredentialStatus;
use tracing::{debug, info, warn};

#[derive(Clone)]
pub struct TestCredentialUseCase {
    registry: ProviderRegistry,
    behavior: BehaviorConfig,
}

impl TestCredentialUseCase {
    pub fn new(registry: ProviderRegistry) -> Self {
        Self {
            registry,
            behavior: BehaviorConfig::default(),
        }
    }

    pub fn with_behavior(mut self, behavior: BehaviorConfig) -> Self {
        self.behavior = behavior;
        self
    }

    pub async fn execute(&self, provider_id: &str, secret: &str) -> CredentialStatus {
        let secret = secret.trim();
        if secret.is_empty() {
            debug!("Empty credential for {}, not probing", provider_id);
            return CredentialStatus::Invalid;
        }

        let adapter = match self.registry.resolve(provider_id) {
            Ok(adapter) => adapter,
            Err(e) => {
                warn!("Cannot test credential: {}", e);
                return CredentialStatus::Error;
            }
        };
        if !adapter.supports_probe() {
            warn!("Provider {} has no credential probe", provider_id);
            return CredentialStatus::Error;
        }

        let status = match self.behavior.timeout {
            Some(limit) => tokio::time::timeout(limit, adapter.probe(secret))
                .await
                .unwrap_or_else(|_| {
                    warn!("Credential probe for {} timed out", provider_id);
                    CredentialStatus::Error
                }),
            None => adapter.probe(secret).await,
        };

        info!("Credential for {} is {}", provider_id, status);
        status
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{Fixture, ScriptedAdapter};

    #[tokio::test]
    async fn empty_secret_is_invalid_without_probe() {
        let fx = Fixture::new(vec![
            ScriptedAdapter::replying("openai", "").probing(CredentialStatus::Valid),
        ]);
        let tester = TestCredentialUseCase::new(fx.registry.clone());

        assert_eq!(tester.execute("openai", "  ").await, CredentialStatus::Invalid);
        assert!(fx.adapter("openai").probed_with().is_empty());
    }

    #[tokio::test]
    async fn probe_result_is_reported_and_repeatable() {
        let fx = Fixture::new(vec![
            ScriptedAdapter::replying("openai", "").probing(CredentialStatus::Valid),
            ScriptedAdapter::replying("anthropic", "").probing(CredentialStatus::Invalid),
        ]);
        let tester = TestCredentialUseCase::new(fx.registry.clone());
        let before = fx.sessions.snapshot();

        assert_eq!(tester.execute("openai", "sk-1").await, CredentialStatus::Valid);
        assert_eq!(tester.execute("openai", "sk-1").await, CredentialStatus::Valid);
        assert_eq!(
            tester.execute("anthropic", " sk-ant ").await,
            CredentialStatus::Invalid
        );

        assert_eq!(fx.adapter("openai").probed_with(), ["sk-1", "sk-1"]);
        assert_eq!(fx.adapter("anthropic").probed_with(), ["sk-ant"]);
        assert_eq!(fx.sessions.snapshot(), before);
        assert!(!fx.credentials.is_configured("openai"));
    }

    #[tokio::test]
    async fn unknown_or_unprobeable_provider_is_error() {
        let fx = Fixture::new(vec![ScriptedAdapter::replying("cohere", "")]);
        let tester = TestCredentialUseCase::new(fx.registry.clone());

        assert_eq!(tester.execute("bard", "key").await, CredentialStatus::Error);
        assert_eq!(tester.execute("cohere", "key").await, CredentialStatus::Error);
    }

    #[tokio::test(start_paused = true)]
    async fn hung_probe_times_out_as_error() {
        let fx = Fixture::new(vec![
            ScriptedAdapter::replying("openai", "")
                .probing(CredentialStatus::Valid)
                .gated(),
        ]);
        let tester = TestCredentialUseCase::new(fx.registry.clone())
            .with_behavior(BehaviorConfig::with_timeout_seconds(3));

        assert_eq!(tester.execute("openai", "sk-1").await, CredentialStatus::Error);
    }
}
