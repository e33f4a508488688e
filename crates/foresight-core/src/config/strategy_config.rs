use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::defaults;

/// Delay per bundle priority, in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PriorityDelays {
    pub high_ms: u64,
    pub medium_ms: u64,
    pub low_ms: u64,
}

impl Default for PriorityDelays {
    fn default() -> Self {
        Self {
            high_ms: defaults::DEFAULT_HIGH_PRIORITY_DELAY_MS,
            medium_ms: defaults::DEFAULT_MEDIUM_PRIORITY_DELAY_MS,
            low_ms: defaults::DEFAULT_LOW_PRIORITY_DELAY_MS,
        }
    }
}

/// Strategy engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyConfig {
    /// Effective transition probability a pattern must exceed to fire.
    pub probability_threshold: f64,
    /// Pattern delay used when a pattern sets none.
    pub default_pattern_delay_ms: u64,
    /// Session age after which frequently used resources are preloaded.
    pub session_gate_ms: u64,
    /// Timer standing in for the idle signal on hosts without one.
    pub idle_fallback_ms: u64,
    pub priority_delays: PriorityDelays,
}

impl StrategyConfig {
    pub fn default_pattern_delay(&self) -> Duration {
        Duration::from_millis(self.default_pattern_delay_ms)
    }

    pub fn session_gate(&self) -> Duration {
        Duration::from_millis(self.session_gate_ms)
    }

    pub fn idle_fallback(&self) -> Duration {
        Duration::from_millis(self.idle_fallback_ms)
    }
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            probability_threshold: defaults::DEFAULT_PROBABILITY_THRESHOLD,
            default_pattern_delay_ms: defaults::DEFAULT_PATTERN_DELAY_MS,
            session_gate_ms: defaults::DEFAULT_SESSION_GATE_MS,
            idle_fallback_ms: defaults::DEFAULT_IDLE_FALLBACK_MS,
            priority_delays: PriorityDelays::default(),
        }
    }
}
