//! Request configuration from TOML (`[request]` section)

use chorus_application::config::{BehaviorConfig, DEFAULT_REQUEST_TIMEOUT_SECS};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRequestConfig {
    /// Deadline for one provider call or credential probe. `0` waits forever.
    pub timeout_secs: u64,
}

impl Default for FileRequestConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl FileRequestConfig {
    pub fn to_behavior(&self) -> BehaviorConfig {
        BehaviorConfig::with_timeout_seconds(self.timeout_secs)
    }
}
