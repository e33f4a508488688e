mod config_error;
mod load_error;

pub use config_error::ConfigError;
pub use load_error::LoadError;

/// Top-level error for the Foresight system.
#[derive(Debug, thiserror::Error)]
pub enum ForesightError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("observability setup failed: {reason}")]
    Observability { reason: String },
}

pub type ForesightResult<T> = Result<T, ForesightError>;
