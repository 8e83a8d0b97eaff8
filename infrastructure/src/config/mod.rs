//! Configuration file loading for chorus
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `--config <path>` specified file
//! 2. Project root: `./chorus.toml` or `./.chorus.toml`
//! 3. Global config: `<config_dir>/chorus/config.toml`
//! 4. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileConfig, FileCredentialsConfig, FileLoggingConfig,
    FileOutputConfig, FileProviderConfig, FileProvidersConfig, FileReplConfig,
    FileRequestConfig, FileSessionSeed, FileSessionsConfig,
};
pub use loader::ConfigLoader;
