//! Provider adapter port
//!
//! Defines the capability every provider implementation offers: translate
//! a uniform chat request into the provider's wire protocol, and probe a
//! credential.

use async_trait::async_trait;
use chorus_domain::{CredentialStatus, FailureKind, Message, classify_response};
use std::fmt;
use thiserror::Error;

/// A provider call that did not yield assistant text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderFailure {
    /// The provider refused the credential.
    #[error("{message}")]
    Auth { status: Option<u16>, message: String },

    /// Any other non-success response, or a success response of the wrong shape.
    #[error("{message}")]
    Provider { status: Option<u16>, message: String },

    /// No response was obtained.
    #[error("{0}")]
    Transport(String),

    /// No adapter is registered for the provider.
    #[error("no adapter registered for provider '{0}'")]
    Unsupported(String),
}

impl ProviderFailure {
    /// Classify a non-success HTTP response from its status and the
    /// provider's own error message.
    pub fn from_response(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match classify_response(status, &message) {
            FailureKind::AuthFailure => ProviderFailure::Auth {
                status: Some(status),
                message,
            },
            _ => ProviderFailure::Provider {
                status: Some(status),
                message,
            },
        }
    }

    /// A success response whose body lacks the expected reply.
    pub fn unexpected_shape(detail: impl fmt::Display) -> Self {
        ProviderFailure::Provider {
            status: None,
            message: format!("unexpected response shape: {}", detail),
        }
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            ProviderFailure::Auth { .. } => FailureKind::AuthFailure,
            ProviderFailure::Provider { .. } => FailureKind::ProviderError,
            ProviderFailure::Transport(_) => FailureKind::TransportFailure,
            ProviderFailure::Unsupported(_) => FailureKind::UnsupportedProvider,
        }
    }

    /// The provider-facing detail used in the user explanation.
    pub fn detail(&self) -> &str {
        match self {
            ProviderFailure::Auth { message, .. } | ProviderFailure::Provider { message, .. } => {
                message
            }
            ProviderFailure::Transport(detail) => detail,
            ProviderFailure::Unsupported(provider) => provider,
        }
    }
}

/// Everything an adapter needs for one call.
#[derive(Clone)]
pub struct ChatRequest {
    pub model: String,
    pub system_prompt: Option<String>,
    /// Full conversation, oldest first; the last entry is the new user turn.
    pub history: Vec<Message>,
    pub credential: String,
}

impl ChatRequest {
    pub fn new(model: impl Into<String>, history: Vec<Message>, credential: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            system_prompt: None,
            history,
            credential: credential.into(),
        }
    }

    pub fn with_system_prompt(mut self, prompt: Option<String>) -> Self {
        self.system_prompt = prompt.filter(|p| !p.trim().is_empty());
        self
    }
}

impl fmt::Debug for ChatRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatRequest")
            .field("model", &self.model)
            .field("system_prompt", &self.system_prompt)
            .field("history_len", &self.history.len())
            .field("credential", &"<redacted>")
            .finish()
    }
}

/// One provider's wire protocol.
///
/// Implementations live in the infrastructure layer and are looked up by
/// [`ProviderRegistry`](crate::registry::ProviderRegistry) through their
/// provider id.
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    /// Catalog id this adapter serves (e.g. "openai").
    fn provider_id(&self) -> &str;

    /// Send the conversation and return the assistant text.
    async fn invoke(&self, request: &ChatRequest) -> Result<String, ProviderFailure>;

    /// Whether [`probe`](Self::probe) issues a real request.
    fn supports_probe(&self) -> bool {
        false
    }

    /// Issue a minimal request to test a credential.
    ///
    /// Adapters without a probe endpoint report [`CredentialStatus::Error`].
    async fn probe(&self, _credential: &str) -> CredentialStatus {
        CredentialStatus::Error
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_response_classifies_auth() {
        let failure = ProviderFailure::from_response(401, "invalid x-api-key");
        assert_eq!(failure.kind(), FailureKind::AuthFailure);
        assert_eq!(failure.detail(), "invalid x-api-key");

        let failure = ProviderFailure::from_response(400, "Incorrect API key provided");
        assert_eq!(failure.kind(), FailureKind::AuthFailure);
    }

    #[test]
    fn from_response_passes_provider_message_through() {
        let failure = ProviderFailure::from_response(429, "Rate limit reached for gpt-4");
        assert_eq!(failure.kind(), FailureKind::ProviderError);
        assert_eq!(failure.to_string(), "Rate limit reached for gpt-4");
    }

    #[test]
    fn debug_redacts_credential() {
        let request = ChatRequest::new("gpt-4", vec![Message::user("hi")], "sk-secret");
        let debug = format!("{:?}", request);
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn blank_system_prompt_is_dropped() {
        let request = ChatRequest::new("gpt-4", vec![], "k").with_system_prompt(Some(" ".into()));
        assert_eq!(request.system_prompt, None);
    }
}
