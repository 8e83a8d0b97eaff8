//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod credentials;
mod logging;
mod output;
mod providers;
mod repl;
mod request;
mod sessions;

pub use credentials::FileCredentialsConfig;
pub use logging::FileLoggingConfig;
pub use output::FileOutputConfig;
pub use providers::{FileProviderConfig, FileProvidersConfig};
pub use repl::FileReplConfig;
pub use request::FileRequestConfig;
pub use sessions::{FileSessionSeed, FileSessionsConfig};

use crate::providers::SUPPORTED_PROVIDERS;
use chorus_domain::{MAX_SESSIONS, ProviderCatalog};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Problems found by [`FileConfig::validate`]. None of them stop startup;
/// the offending value falls back to its default or is skipped.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigValidationError {
    #[error("{section}: unknown provider '{provider}'")]
    UnknownProvider { section: String, provider: String },

    #[error("sessions.initial: provider '{provider}' has no model '{model}'")]
    UnknownModel { provider: String, model: String },

    #[error("providers.{0}.max_tokens cannot be 0")]
    ZeroMaxTokens(String),

    #[error("providers.{provider}.temperature must be between 0 and 2, got {value}")]
    TemperatureOutOfRange { provider: String, value: f64 },

    #[error("providers.{provider}.base_url must start with http:// or https://, got '{url}'")]
    InvalidBaseUrl { provider: String, url: String },

    #[error("sessions.initial lists {0} sessions; only the first {MAX_SESSIONS} are opened")]
    TooManySessions(usize),
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Per-provider endpoint and sampling overrides
    pub providers: FileProvidersConfig,
    /// Sessions opened at startup
    pub sessions: FileSessionsConfig,
    /// Request deadline
    pub request: FileRequestConfig,
    /// Key store location
    pub credentials: FileCredentialsConfig,
    /// Output settings
    pub output: FileOutputConfig,
    /// Transcript settings
    pub logging: FileLoggingConfig,
    /// Line editor settings
    pub repl: FileReplConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut issues = Vec::new();

        // 1. Provider overrides
        for (id, overrides) in &self.providers.entries {
            if !SUPPORTED_PROVIDERS.contains(&id.as_str()) {
                issues.push(ConfigValidationError::UnknownProvider {
                    section: "providers".to_string(),
                    provider: id.clone(),
                });
            }
            if overrides.max_tokens == Some(0) {
                issues.push(ConfigValidationError::ZeroMaxTokens(id.clone()));
            }
            if let Some(value) = overrides.temperature
                && !(0.0..=2.0).contains(&value)
            {
                issues.push(ConfigValidationError::TemperatureOutOfRange {
                    provider: id.clone(),
                    value,
                });
            }
            if let Some(url) = &overrides.base_url
                && !(url.starts_with("http://") || url.starts_with("https://"))
            {
                issues.push(ConfigValidationError::InvalidBaseUrl {
                    provider: id.clone(),
                    url: url.clone(),
                });
            }
        }

        // 2. Initial sessions
        let catalog = ProviderCatalog::default();
        for seed in &self.sessions.initial {
            match catalog.get(&seed.provider) {
                None => issues.push(ConfigValidationError::UnknownProvider {
                    section: "sessions.initial".to_string(),
                    provider: seed.provider.clone(),
                }),
                Some(descriptor) => {
                    if let Some(model) = &seed.model
                        && !descriptor.supports_model(model)
                    {
                        issues.push(ConfigValidationError::UnknownModel {
                            provider: seed.provider.clone(),
                            model: model.clone(),
                        });
                    }
                }
            }
        }
        if self.sessions.initial.len() > MAX_SESSIONS {
            issues.push(ConfigValidationError::TooManySessions(
                self.sessions.initial.len(),
            ));
        }

        issues
    }

    /// Replace the provider overrides with usable values only.
    ///
    /// Zero `max_tokens`, out-of-range temperatures and non-HTTP base URLs
    /// are dropped so the built-in value applies.
    pub fn sanitized_providers(&self) -> FileProvidersConfig {
        let mut providers = self.providers.clone();
        for overrides in providers.entries.values_mut() {
            if overrides.max_tokens == Some(0) {
                overrides.max_tokens = None;
            }
            if overrides
                .temperature
                .is_some_and(|t| !(0.0..=2.0).contains(&t))
            {
                overrides.temperature = None;
            }
            if overrides
                .base_url
                .as_ref()
                .is_some_and(|u| !(u.starts_with("http://") || u.starts_with("https://")))
            {
                overrides.base_url = None;
            }
        }
        providers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[providers.anthropic]
base_url = "https://proxy.example.com"
max_tokens = 2048

[sessions]
initial = [{ provider = "anthropic", model = "claude-3-opus" }, { provider = "cohere" }]

[request]
timeout_secs = 30

[credentials]
persist = false

[output]
color = false

[logging]
transcript = "/tmp/chorus.jsonl"
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.sessions.initial.len(), 2);
        assert_eq!(config.request.timeout_secs, 30);
        assert!(!config.credentials.persist);
        assert!(!config.output.color);
        assert!(config.output.show_progress);
        assert_eq!(
            config.logging.transcript.as_deref(),
            Some(std::path::Path::new("/tmp/chorus.jsonl"))
        );
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_default_config() {
        let config = FileConfig::default();
        assert!(config.providers.entries.is_empty());
        assert!(config.sessions.initial.is_empty());
        assert_eq!(config.request.timeout_secs, 120);
        assert!(config.credentials.persist);
        assert!(config.output.color);
        assert!(config.logging.transcript.is_none());
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(FileConfig::default().validate().is_empty());
    }

    #[test]
    fn test_validate_reports_every_issue() {
        let toml_str = r#"
[providers.bard]
max_tokens = 10

[providers.openai]
max_tokens = 0
temperature = 3.5
base_url = "api.openai.com"

[sessions]
initial = [{ provider = "openai", model = "claude-3-opus" }, { provider = "palm" }]
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        let issues = config.validate();

        assert!(issues.contains(&ConfigValidationError::UnknownProvider {
            section: "providers".into(),
            provider: "bard".into(),
        }));
        assert!(issues.contains(&ConfigValidationError::ZeroMaxTokens("openai".into())));
        assert!(issues.contains(&ConfigValidationError::TemperatureOutOfRange {
            provider: "openai".into(),
            value: 3.5,
        }));
        assert!(issues.iter().any(|i| matches!(i, ConfigValidationError::InvalidBaseUrl { .. })));
        assert!(issues.contains(&ConfigValidationError::UnknownModel {
            provider: "openai".into(),
            model: "claude-3-opus".into(),
        }));
        assert!(issues.contains(&ConfigValidationError::UnknownProvider {
            section: "sessions.initial".into(),
            provider: "palm".into(),
        }));
        assert_eq!(issues.len(), 6);
    }

    #[test]
    fn sanitized_providers_drop_bad_values() {
        let toml_str = r#"
[providers.openai]
max_tokens = 0
temperature = 0.3
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        let settings = config.sanitized_providers().settings_for("openai").unwrap();
        assert_eq!(settings.max_tokens, 1000);
        assert_eq!(settings.temperature, 0.3);
    }
}
