//! Provider adapters
//!
//! One [`ProviderAdapter`] per supported provider, each translating the
//! uniform chat request into the provider's wire format over an injected
//! [`HttpTransport`]. [`build_registry`] wires all of them.

mod anthropic;
mod cohere;
mod google;
mod openai_compatible;
mod wire;

pub use anthropic::AnthropicAdapter;
pub use cohere::CohereAdapter;
pub use google::GoogleAdapter;
pub use openai_compatible::OpenAiCompatibleAdapter;

use crate::config::FileProvidersConfig;
use crate::transport::HttpTransport;
use chorus_application::ports::provider_adapter::ProviderAdapter;
use chorus_application::registry::ProviderRegistry;
use std::sync::Arc;
use tracing::debug;

pub const DEFAULT_MAX_TOKENS: u32 = 1000;
pub const DEFAULT_TEMPERATURE: f64 = 0.7;

/// Endpoint and sampling parameters for one provider.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderSettings {
    /// Scheme and host, without a trailing path (e.g. `https://api.openai.com`).
    pub base_url: String,
    pub max_tokens: u32,
    pub temperature: f64,
}

impl ProviderSettings {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    /// Built-in settings for a known provider id.
    pub fn defaults_for(provider_id: &str) -> Option<Self> {
        let base_url = match provider_id {
            "openai" => "https://api.openai.com",
            "anthropic" => "https://api.anthropic.com",
            "google" => "https://generativelanguage.googleapis.com",
            "grok" => "https://api.x.ai",
            "mistral" => "https://api.mistral.ai",
            "cohere" => "https://api.cohere.ai",
            _ => return None,
        };
        Some(Self::new(base_url))
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

/// Provider ids with a built-in adapter, in catalog order.
pub const SUPPORTED_PROVIDERS: [&str; 6] =
    ["openai", "anthropic", "google", "grok", "mistral", "cohere"];

/// Register an adapter for every supported provider, applying any
/// configured overrides.
pub fn build_registry(
    config: &FileProvidersConfig,
    transport: Arc<dyn HttpTransport>,
) -> ProviderRegistry {
    let mut registry = ProviderRegistry::new();

    for id in SUPPORTED_PROVIDERS {
        let Some(settings) = config.settings_for(id) else {
            continue;
        };
        debug!(
            "Registering {} adapter at {} (max_tokens={}, temperature={})",
            id, settings.base_url, settings.max_tokens, settings.temperature
        );

        let adapter: Arc<dyn ProviderAdapter> = match id {
            "anthropic" => Arc::new(AnthropicAdapter::new(settings, transport.clone())),
            "google" => Arc::new(GoogleAdapter::new(settings, transport.clone())),
            "cohere" => Arc::new(CohereAdapter::new(settings, transport.clone())),
            "openai" => Arc::new(OpenAiCompatibleAdapter::openai(settings, transport.clone())),
            "grok" => Arc::new(OpenAiCompatibleAdapter::grok(settings, transport.clone())),
            "mistral" => Arc::new(OpenAiCompatibleAdapter::mistral(settings, transport.clone())),
            _ => continue,
        };
        registry.register(adapter);
    }

    registry
}
