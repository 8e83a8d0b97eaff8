//! Credential probe outcome.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Result of testing a credential against its provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialStatus {
    /// The provider accepted the credential.
    Valid,
    /// The provider answered but refused the credential (or it was empty).
    Invalid,
    /// No verdict: network failure, timeout, or the provider cannot be probed.
    Error,
}

impl CredentialStatus {
    pub fn is_valid(&self) -> bool {
        matches!(self, CredentialStatus::Valid)
    }
}

impl fmt::Display for CredentialStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialStatus::Valid => write!(f, "valid"),
            CredentialStatus::Invalid => write!(f, "invalid"),
            CredentialStatus::Error => write!(f, "error"),
        }
    }
}
