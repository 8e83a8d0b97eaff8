//! Credential storage configuration from TOML (`[credentials]` section)

use crate::storage::FileKeyValueStore;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCredentialsConfig {
    /// Key store file (default: `<config_dir>/chorus/credentials.json`)
    pub path: Option<PathBuf>,
    /// Write saved keys to disk; `false` keeps them for this run only
    pub persist: bool,
}

impl Default for FileCredentialsConfig {
    fn default() -> Self {
        Self {
            path: None,
            persist: true,
        }
    }
}

impl FileCredentialsConfig {
    /// Where the key store lives, if it is persisted at all.
    pub fn store_path(&self) -> Option<PathBuf> {
        if !self.persist {
            return None;
        }
        self.path.clone().or_else(FileKeyValueStore::default_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_path_wins() {
        let config = FileCredentialsConfig {
            path: Some(PathBuf::from("/tmp/keys.json")),
            persist: true,
        };
        assert_eq!(config.store_path(), Some(PathBuf::from("/tmp/keys.json")));
    }

    #[test]
    fn no_path_when_not_persisted() {
        let config = FileCredentialsConfig {
            path: Some(PathBuf::from("/tmp/keys.json")),
            persist: false,
        };
        assert_eq!(config.store_path(), None);
    }
}
