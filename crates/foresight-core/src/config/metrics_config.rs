use serde::{Deserialize, Serialize};

use super::defaults;

/// Load-timing metrics configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Finalized metrics retained before the oldest are dropped.
    pub history_capacity: usize,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            history_capacity: defaults::DEFAULT_METRICS_HISTORY_CAPACITY,
        }
    }
}
