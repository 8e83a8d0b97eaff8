//! Application layer for chorus
//!
//! This crate contains use cases, port definitions, the provider registry
//! and application configuration. It depends only on the domain layer.

pub mod config;
pub mod controller;
pub mod credentials;
pub mod ports;
pub mod registry;
pub mod sessions;
pub mod use_cases;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export commonly used types
pub use config::{BehaviorConfig, DEFAULT_REQUEST_TIMEOUT_SECS};
pub use controller::{ChatController, SubmitOutcome};
pub use credentials::CredentialStore;
pub use ports::{
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    key_value_store::{InMemoryKeyValueStore, KeyValueError, KeyValueStore},
    progress::{BroadcastProgress, NoProgress},
    provider_adapter::{ChatRequest, ProviderAdapter, ProviderFailure},
};
pub use registry::ProviderRegistry;
pub use sessions::SharedSessions;
pub use use_cases::broadcast::{BroadcastReport, BroadcastUseCase};
pub use use_cases::save_credentials::{SaveCredentialsUseCase, SaveReport};
pub use use_cases::send_message::{SendMessageUseCase, SendOutcome};
pub use use_cases::test_credential::TestCredentialUseCase;
