use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::defaults;

/// Shape of the delay inserted before each retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackoffKind {
    /// `base × retry` (1s, 2s, 3s, ... with the default base).
    #[default]
    Linear,
    /// `base × 2^(retry - 1)` (1s, 2s, 4s, ... with the default base).
    Exponential,
}

/// Retry subsystem configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Total attempts per load, including the first.
    pub max_attempts: u32,
    /// Base backoff delay in milliseconds.
    pub base_delay_ms: u64,
    pub backoff: BackoffKind,
}

impl RetryConfig {
    /// Delay before retry number `retry` (1 = the wait before the second attempt).
    pub fn backoff_delay(&self, retry: u32) -> Duration {
        let base = self.base_delay_ms;
        let ms = match self.backoff {
            BackoffKind::Linear => base.saturating_mul(u64::from(retry)),
            BackoffKind::Exponential => {
                let exp = retry.saturating_sub(1).min(32);
                base.saturating_mul(1u64 << exp)
            }
        };
        Duration::from_millis(ms)
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: defaults::DEFAULT_MAX_ATTEMPTS,
            base_delay_ms: defaults::DEFAULT_BASE_DELAY_MS,
            backoff: BackoffKind::default(),
        }
    }
}
