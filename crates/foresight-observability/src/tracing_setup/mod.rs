//! Global subscriber installation.

pub mod spans;

use foresight_core::config::ObservabilityConfig;
use foresight_core::{ForesightError, ForesightResult};
use tracing_subscriber::EnvFilter;

/// Install a global `tracing` subscriber.
///
/// `RUST_LOG` takes precedence over `config.log_level`. Fails if the filter
/// directive is invalid or a global subscriber is already installed.
pub fn init_tracing(config: &ObservabilityConfig) -> ForesightResult<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => build_filter(&config.log_level)?,
    };

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);
    let installed = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    installed.map_err(|e| ForesightError::Observability {
        reason: e.to_string(),
    })
}

/// Parse a filter directive such as `"info"` or `"foresight_cache=debug"`.
pub fn build_filter(directive: &str) -> ForesightResult<EnvFilter> {
    EnvFilter::try_new(directive).map_err(|e| ForesightError::Observability {
        reason: format!("invalid log filter {directive:?}: {e}"),
    })
}
