//! Failure taxonomy for a send.
//!
//! Every failed send is tagged with a [`FailureKind`]; the kind drives the
//! text shown to the user and whether the session's credential is flagged
//! as invalid.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Classified reason a send did not produce an assistant reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// No secret configured for the session's provider (detected before any request).
    MissingCredential,
    /// The provider rejected the credential.
    AuthFailure,
    /// Any other non-success provider response.
    ProviderError,
    /// No response obtained (connection error, timeout).
    TransportFailure,
    /// No adapter registered for the session's provider.
    UnsupportedProvider,
}

impl FailureKind {
    /// Whether this failure marks the session's credential as invalid.
    pub fn invalidates_credential(&self) -> bool {
        matches!(self, FailureKind::AuthFailure)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::MissingCredential => "missing_credential",
            FailureKind::AuthFailure => "auth_failure",
            FailureKind::ProviderError => "provider_error",
            FailureKind::TransportFailure => "transport_failure",
            FailureKind::UnsupportedProvider => "unsupported_provider",
        }
    }

    /// Human-readable explanation appended to the session log.
    ///
    /// `provider_id` is used where the user needs the exact id to act on
    /// (configuring a key), `provider_name` everywhere else.
    pub fn explain(&self, provider_id: &str, provider_name: &str, detail: &str) -> String {
        match self {
            FailureKind::MissingCredential => format!(
                "No API key configured for {}. Add one with /key {} <secret>.",
                provider_name, provider_id
            ),
            FailureKind::AuthFailure => format!(
                "Authentication failed for {}: {}. Check your API key.",
                provider_name, detail
            ),
            FailureKind::ProviderError => {
                format!("{} returned an error: {}", provider_name, detail)
            }
            FailureKind::TransportFailure => {
                format!("Could not reach {}: {}", provider_name, detail)
            }
            FailureKind::UnsupportedProvider => {
                format!("Provider '{}' is not supported.", provider_id)
            }
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Markers in a provider error message that indicate a credential problem.
const AUTH_MARKERS: &[&str] = &[
    "api key",
    "api_key",
    "authentication",
    "unauthorized",
    "permission",
];

/// Classify a non-success provider response.
///
/// 401/403, or a message mentioning one of the auth markers (case
/// insensitive), is an [`FailureKind::AuthFailure`]; everything else is a
/// [`FailureKind::ProviderError`].
pub fn classify_response(status: u16, message: &str) -> FailureKind {
    if status == 401 || status == 403 {
        return FailureKind::AuthFailure;
    }
    let lowered = message.to_lowercase();
    if AUTH_MARKERS.iter().any(|marker| lowered.contains(marker)) {
        FailureKind::AuthFailure
    } else {
        FailureKind::ProviderError
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_classify_as_auth() {
        assert_eq!(classify_response(401, ""), FailureKind::AuthFailure);
        assert_eq!(classify_response(403, "forbidden"), FailureKind::AuthFailure);
    }

    #[test]
    fn message_markers_classify_as_auth() {
        assert_eq!(
            classify_response(400, "Incorrect API Key provided: sk-..."),
            FailureKind::AuthFailure
        );
        assert_eq!(
            classify_response(400, "API_KEY_INVALID"),
            FailureKind::AuthFailure
        );
        assert_eq!(
            classify_response(500, "Authentication backend unavailable"),
            FailureKind::AuthFailure
        );
    }

    #[test]
    fn other_responses_are_provider_errors() {
        assert_eq!(
            classify_response(429, "Rate limit reached"),
            FailureKind::ProviderError
        );
        assert_eq!(
            classify_response(404, "model not found"),
            FailureKind::ProviderError
        );
    }

    #[test]
    fn only_auth_failure_invalidates_credential() {
        assert!(FailureKind::AuthFailure.invalidates_credential());
        assert!(!FailureKind::MissingCredential.invalidates_credential());
        assert!(!FailureKind::ProviderError.invalidates_credential());
        assert!(!FailureKind::TransportFailure.invalidates_credential());
    }

    #[test]
    fn missing_credential_explanation_names_provider() {
        let text = FailureKind::MissingCredential.explain("anthropic", "Anthropic", "");
        assert!(text.contains("Anthropic"));
        assert!(text.contains("/key anthropic"));
    }
}
