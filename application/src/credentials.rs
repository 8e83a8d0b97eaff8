//! Credential lookup on top of the key-value store port.

use crate::ports::key_value_store::{KeyValueError, KeyValueStore};
use std::sync::Arc;
use tracing::warn;

const KEY_PREFIX: &str = "credential.";

/// Provider id → secret, backed by an injected [`KeyValueStore`].
///
/// A missing entry, an empty string, or an unreadable store all mean
/// "not configured".
#[derive(Clone)]
pub struct CredentialStore {
    store: Arc<dyn KeyValueStore>,
}

impl CredentialStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    fn key(provider_id: &str) -> String {
        format!("{}{}", KEY_PREFIX, provider_id)
    }

    /// The configured secret for a provider, if any.
    pub fn get(&self, provider_id: &str) -> Option<String> {
        match self.store.get(&Self::key(provider_id)) {
            Ok(value) => value.filter(|secret| !secret.trim().is_empty()),
            Err(e) => {
                warn!("Could not read credential for {}: {}", provider_id, e);
                None
            }
        }
    }

    pub fn is_configured(&self, provider_id: &str) -> bool {
        self.get(provider_id).is_some()
    }

    /// Persist a secret. An empty string un-configures the provider.
    pub fn set(&self, provider_id: &str, secret: &str) -> Result<(), KeyValueError> {
        self.store.set(&Self::key(provider_id), secret.trim())
    }
}
