//! REPL configuration from TOML (`[repl]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileReplConfig {
    /// Line history file (default: `<data_dir>/chorus/history.txt`)
    pub history_file: Option<PathBuf>,
    /// Keep line history across runs
    pub save_history: bool,
}

impl Default for FileReplConfig {
    fn default() -> Self {
        Self {
            history_file: None,
            save_history: true,
        }
    }
}

impl FileReplConfig {
    /// Where line history is kept, if it is kept at all.
    pub fn history_path(&self) -> Option<PathBuf> {
        if !self.save_history {
            return None;
        }
        self.history_file
            .clone()
            .or_else(|| dirs::data_dir().map(|d| d.join("chorus").join("history.txt")))
    }
}
