/// Configuration and preload-plan errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to parse configuration: {reason}")]
    Parse { reason: String },

    #[error("{field} must be within [0, 1], got {value}")]
    InvalidProbability { field: String, value: f64 },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("unknown {kind} key: {key}")]
    UnknownKey { kind: &'static str, key: String },

    #[error("pattern {from} -> {to} targets a route with no mapped component")]
    UnmappedRoute { from: String, to: String },
}
