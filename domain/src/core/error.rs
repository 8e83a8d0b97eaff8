//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Unknown provider: {0}")]
    UnknownProvider(String),

    #[error("Model '{model}' is not offered by provider '{provider}'")]
    UnknownModel { provider: String, model: String },

    #[error("Session {0} not found")]
    SessionNotFound(u64),

    #[error("Session {0} already has a request in flight")]
    SessionBusy(u64),

    #[error("Provider catalog is empty")]
    EmptyCatalog,
}

impl DomainError {
    /// Check if this error refers to a missing session
    pub fn is_not_found(&self) -> bool {
        matches!(self, DomainError::SessionNotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_model_display() {
        let error = DomainError::UnknownModel {
            provider: "openai".to_string(),
            model: "claude-3-opus".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Model 'claude-3-opus' is not offered by provider 'openai'"
        );
    }

    #[test]
    fn test_is_not_found_check() {
        assert!(DomainError::SessionNotFound(3).is_not_found());
        assert!(!DomainError::EmptyCatalog.is_not_found());
        assert!(!DomainError::UnknownProvider("x".to_string()).is_not_found());
    }
}
