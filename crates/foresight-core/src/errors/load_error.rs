/// Errors produced while materializing a resource.
///
/// `Clone` because a single in-flight load is shared by every waiting caller.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LoadError {
    #[error("loader failed: {reason}")]
    Failed { reason: String },

    #[error("loading {key} failed after {attempts} attempts: {last_error}")]
    Exhausted {
        key: String,
        attempts: u32,
        last_error: Box<LoadError>,
    },

    #[error("no loader registered for {key}")]
    Unregistered { key: String },

    #[error("load task for {key} aborted: {reason}")]
    Aborted { key: String, reason: String },
}

impl LoadError {
    /// A single failed loader attempt.
    pub fn failed(reason: impl Into<String>) -> Self {
        Self::Failed {
            reason: reason.into(),
        }
    }

    /// Attempts made before giving up, for exhausted loads.
    pub fn attempts(&self) -> Option<u32> {
        match self {
            Self::Exhausted { attempts, .. } => Some(*attempts),
            _ => None,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self, Self::Exhausted { .. })
    }
}
