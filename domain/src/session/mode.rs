//! Send mode definitions.
//!
//! [`SendMode`] decides where a line typed into the shared input goes:
//! - Individual: to the focused session only
//! - Broadcast: to every session at once

use serde::{Deserialize, Serialize};
use std::fmt;

/// How outgoing text is dispatched to sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SendMode {
    /// Each session is addressed on its own.
    #[default]
    Individual,
    /// One input fans out to all sessions concurrently.
    Broadcast,
}

impl SendMode {
    pub fn is_broadcast(&self) -> bool {
        matches!(self, SendMode::Broadcast)
    }

    /// Get a short description for display
    pub fn short_description(&self) -> &'static str {
        match self {
            SendMode::Individual => "Individual: messages go to the focused session",
            SendMode::Broadcast => "Broadcast: messages go to every session",
        }
    }
}

impl fmt::Display for SendMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SendMode::Individual => write!(f, "individual"),
            SendMode::Broadcast => write!(f, "broadcast"),
        }
    }
}

impl std::str::FromStr for SendMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "individual" | "single" | "i" => Ok(SendMode::Individual),
            "broadcast" | "all" | "b" => Ok(SendMode::Broadcast),
            _ => Err(format!("Invalid SendMode: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_individual() {
        assert_eq!(SendMode::default(), SendMode::Individual);
        assert!(!SendMode::default().is_broadcast());
    }

    #[test]
    fn test_from_str_aliases() {
        assert_eq!("broadcast".parse::<SendMode>().unwrap(), SendMode::Broadcast);
        assert_eq!("ALL".parse::<SendMode>().unwrap(), SendMode::Broadcast);
        assert_eq!("i".parse::<SendMode>().unwrap(), SendMode::Individual);
        assert!("both".parse::<SendMode>().is_err());
    }

    #[test]
    fn test_display_roundtrip() {
        for mode in [SendMode::Individual, SendMode::Broadcast] {
            assert_eq!(mode.to_string().parse::<SendMode>().unwrap(), mode);
        }
    }
}
