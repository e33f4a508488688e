use std::borrow::Borrow;
use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::PriorityDelays;

/// A navigable location in the host UI (e.g. `/dashboard`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Route(String);

impl Route {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Route {
    fn from(path: &str) -> Self {
        Self(path.to_string())
    }
}

impl From<String> for Route {
    fn from(path: String) -> Self {
        Self(path)
    }
}

impl Borrow<str> for Route {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Preload urgency of a strategy bundle.
///
/// Ordered `High > Medium > Low`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

    /// Delay before a bundle of this priority starts preloading.
    pub fn delay(self, delays: &PriorityDelays) -> Duration {
        let ms = match self {
            Priority::High => delays.high_ms,
            Priority::Medium => delays.medium_ms,
            Priority::Low => delays.low_ms,
        };
        Duration::from_millis(ms)
    }
}
