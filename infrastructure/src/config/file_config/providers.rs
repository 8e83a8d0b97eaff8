//! Provider configuration from TOML (`[providers.<id>]` sections)

use crate::providers::ProviderSettings;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Overrides for one provider. Unset fields keep the built-in value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProviderConfig {
    /// Scheme and host of the API (e.g. a proxy or a local mock).
    pub base_url: Option<String>,
    /// Reply length limit sent with every request (default: 1000).
    pub max_tokens: Option<u32>,
    /// Sampling temperature sent with every request (default: 0.7).
    pub temperature: Option<f64>,
}

/// All `[providers.<id>]` tables, keyed by provider id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileProvidersConfig {
    pub entries: BTreeMap<String, FileProviderConfig>,
}

impl FileProvidersConfig {
    /// Built-in settings for `provider_id` with overrides applied.
    ///
    /// `None` for a provider without built-in settings.
    pub fn settings_for(&self, provider_id: &str) -> Option<ProviderSettings> {
        let mut settings = ProviderSettings::defaults_for(provider_id)?;
        if let Some(overrides) = self.entries.get(provider_id) {
            if let Some(base_url) = &overrides.base_url {
                settings.base_url = base_url.clone();
            }
            if let Some(max_tokens) = overrides.max_tokens {
                settings.max_tokens = max_tokens;
            }
            if let Some(temperature) = overrides.temperature {
                settings.temperature = temperature;
            }
        }
        Some(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::super::FileConfig;

    #[test]
    fn overrides_apply_per_field() {
        let toml_str = r#"
[providers.openai]
base_url = "http://localhost:9000"

[providers.cohere]
max_tokens = 256
temperature = 0.2
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();

        let openai = config.providers.settings_for("openai").unwrap();
        assert_eq!(openai.base_url, "http://localhost:9000");
        assert_eq!(openai.max_tokens, 1000);

        let cohere = config.providers.settings_for("cohere").unwrap();
        assert_eq!(cohere.base_url, "https://api.cohere.ai");
        assert_eq!(cohere.max_tokens, 256);
        assert_eq!(cohere.temperature, 0.2);

        assert!(config.providers.settings_for("bard").is_none());
    }
}
