//! Infrastructure layer for chorus
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: the HTTP provider adapters, the on-disk
//! key store, the JSONL transcript and configuration file loading.

pub mod config;
pub mod logging;
pub mod providers;
pub mod storage;
pub mod transport;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, FileConfig, FileCredentialsConfig, FileLoggingConfig,
    FileOutputConfig, FileProviderConfig, FileProvidersConfig, FileReplConfig,
    FileRequestConfig, FileSessionSeed, FileSessionsConfig,
};
pub use logging::JsonlConversationLogger;
pub use providers::{
    AnthropicAdapter, CohereAdapter, GoogleAdapter, OpenAiCompatibleAdapter, ProviderSettings,
    SUPPORTED_PROVIDERS, build_registry,
};
pub use storage::FileKeyValueStore;
pub use transport::{
    HttpMethod, HttpRequest, HttpResponse, HttpTransport, ReqwestTransport, TransportError,
};
