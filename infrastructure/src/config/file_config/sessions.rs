//! Session configuration from TOML (`[sessions]` section)

use chorus_domain::SessionSeed;
use serde::{Deserialize, Serialize};

/// One `{ provider, model }` entry of `sessions.initial`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSessionSeed {
    pub provider: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSessionsConfig {
    /// Sessions opened at startup. Empty means the built-in pair.
    pub initial: Vec<FileSessionSeed>,
}

impl FileSessionsConfig {
    pub fn seeds(&self) -> Vec<SessionSeed> {
        if self.initial.is_empty() {
            return SessionSeed::defaults();
        }
        self.initial
            .iter()
            .map(|seed| SessionSeed::new(seed.provider.clone(), seed.model.clone()))
            .collect()
    }
}
