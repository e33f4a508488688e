pub mod defaults;
mod metrics_config;
mod observability_config;
mod retry_config;
mod strategy_config;

pub use metrics_config::MetricsConfig;
pub use observability_config::ObservabilityConfig;
pub use retry_config::{BackoffKind, RetryConfig};
pub use strategy_config::{PriorityDelays, StrategyConfig};

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// Top-level configuration, one section per subsystem.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ForesightConfig {
    pub retry: RetryConfig,
    pub strategy: StrategyConfig,
    pub metrics: MetricsConfig,
    pub observability: ObservabilityConfig,
}

impl ForesightConfig {
    /// Parse and validate a TOML document. Missing sections use defaults.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s).map_err(|e| ConfigError::Parse {
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to TOML.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string(self).map_err(|e| ConfigError::Parse {
            reason: e.to_string(),
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.retry.max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "retry.max_attempts".to_string(),
                reason: "at least one attempt is required".to_string(),
            });
        }
        let threshold = self.strategy.probability_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(ConfigError::InvalidProbability {
                field: "strategy.probability_threshold".to_string(),
                value: threshold,
            });
        }
        if self.metrics.history_capacity == 0 {
            return Err(ConfigError::InvalidValue {
                field: "metrics.history_capacity".to_string(),
                reason: "history must hold at least one metric".to_string(),
            });
        }
        Ok(())
    }
}
