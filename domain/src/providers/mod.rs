//! Provider catalog (static, serde-free descriptions of supported providers).
//!
//! The catalog is ordered: the order decides which provider a new session
//! receives, and the first model of every descriptor is its default.

use crate::core::error::DomainError;

/// Static catalog entry describing one provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderDescriptor {
    /// Stable identifier, also the adapter registry key (e.g. "openai").
    pub id: String,
    /// Human-readable name used in messages.
    pub display_name: String,
    /// Supported model ids. Never empty; the first entry is the default.
    pub models: Vec<String>,
}

impl ProviderDescriptor {
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        models: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            models: models.into_iter().map(Into::into).collect(),
        }
    }

    /// The model a session gets when it switches to this provider.
    pub fn default_model(&self) -> &str {
        self.models.first().map(String::as_str).unwrap_or_default()
    }

    pub fn supports_model(&self, model: &str) -> bool {
        self.models.iter().any(|m| m == model)
    }
}

/// Ordered list of known providers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderCatalog {
    providers: Vec<ProviderDescriptor>,
}

impl ProviderCatalog {
    /// Build a catalog, rejecting an empty list or a provider without models.
    pub fn new(providers: Vec<ProviderDescriptor>) -> Result<Self, DomainError> {
        if providers.is_empty() {
            return Err(DomainError::EmptyCatalog);
        }
        if let Some(p) = providers.iter().find(|p| p.models.is_empty()) {
            return Err(DomainError::UnknownModel {
                provider: p.id.clone(),
                model: String::new(),
            });
        }
        Ok(Self { providers })
    }

    pub fn get(&self, id: &str) -> Option<&ProviderDescriptor> {
        self.providers.iter().find(|p| p.id == id)
    }

    pub fn require(&self, id: &str) -> Result<&ProviderDescriptor, DomainError> {
        self.get(id)
            .ok_or_else(|| DomainError::UnknownProvider(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn first(&self) -> &ProviderDescriptor {
        // `new` guarantees at least one entry
        &self.providers[0]
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProviderDescriptor> {
        self.providers.iter()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Display name for a provider id, falling back to the id itself.
    pub fn display_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.get(id).map(|p| p.display_name.as_str()).unwrap_or(id)
    }
}

impl Default for ProviderCatalog {
    /// The six providers chorus ships adapters for.
    fn default() -> Self {
        Self {
            providers: vec![
                ProviderDescriptor::new(
                    "openai",
                    "OpenAI",
                    ["gpt-4", "gpt-4-turbo", "gpt-3.5-turbo"],
                ),
                ProviderDescriptor::new(
                    "anthropic",
                    "Anthropic",
                    ["claude-3-opus", "claude-3-sonnet", "claude-3-haiku"],
                ),
                ProviderDescriptor::new(
                    "google",
                    "Google",
                    ["gemini-pro", "gemini-pro-vision", "palm-2"],
                ),
                ProviderDescriptor::new("grok", "Grok", ["grok-1", "grok-1.5"]),
                ProviderDescriptor::new(
                    "mistral",
                    "Mistral",
                    ["mistral-large", "mistral-medium", "mistral-small"],
                ),
                ProviderDescriptor::new("cohere", "Cohere", ["command", "command-light"]),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_catalog_order_and_defaults() {
        let catalog = ProviderCatalog::default();
        let ids: Vec<_> = catalog.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(
            ids,
            ["openai", "anthropic", "google", "grok", "mistral", "cohere"]
        );
        assert_eq!(catalog.first().default_model(), "gpt-4");
        assert_eq!(catalog.require("cohere").unwrap().default_model(), "command");
    }

    #[test]
    fn require_unknown_provider_fails() {
        let catalog = ProviderCatalog::default();
        assert_eq!(
            catalog.require("bard"),
            Err(DomainError::UnknownProvider("bard".to_string()))
        );
    }

    #[test]
    fn empty_catalog_rejected() {
        assert_eq!(ProviderCatalog::new(vec![]), Err(DomainError::EmptyCatalog));
        let no_models = ProviderDescriptor::new("x", "X", Vec::<String>::new());
        assert!(ProviderCatalog::new(vec![no_models]).is_err());
    }

    #[test]
    fn display_name_falls_back_to_id() {
        let catalog = ProviderCatalog::default();
        assert_eq!(catalog.display_name("grok"), "Grok");
        assert_eq!(catalog.display_name("unknown"), "unknown");
    }
}
