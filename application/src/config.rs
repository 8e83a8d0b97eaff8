//! Application-level configuration.
//!
//! This module provides configuration types that control how use cases behave,
//! such as the deadline for a provider call.

use std::time::Duration;

/// Default deadline for a single provider call or credential probe.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

/// Application behavior configuration.
#[derive(Debug, Clone)]
pub struct BehaviorConfig {
    /// Maximum time to wait for a provider response. `None` waits forever.
    pub timeout: Option<Duration>,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self::with_timeout_seconds(DEFAULT_REQUEST_TIMEOUT_SECS)
    }
}

impl BehaviorConfig {
    /// Creates a BehaviorConfig with a timeout specified in seconds.
    ///
    /// `0` disables the deadline.
    pub fn with_timeout_seconds(seconds: u64) -> Self {
        Self {
            timeout: (seconds > 0).then(|| Duration::from_secs(seconds)),
        }
    }

    /// No deadline at all.
    pub fn without_timeout() -> Self {
        Self { timeout: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_disables_timeout() {
        assert_eq!(BehaviorConfig::with_timeout_seconds(0).timeout, None);
        assert_eq!(
            BehaviorConfig::with_timeout_seconds(5).timeout,
            Some(Duration::from_secs(5))
        );
    }

    #[test]
    fn default_uses_two_minutes() {
        assert_eq!(
            BehaviorConfig::default().timeout,
            Some(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS))
        );
    }
}
