//! The four preload policies plus the UI triggers, by name.
//!
//! Each policy lives in its own module as an `impl` block on the engine
//! internals; pure decision helpers sit next to them.

pub mod bundle;
pub mod idle;
pub mod pattern;
pub mod session_gate;

use std::fmt;

use serde::Serialize;

/// Which rule caused a preload. Used in spans and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Policy {
    StaticPattern,
    RouteBundle,
    SessionGate,
    IdleTime,
    HoverIntent,
    Visibility,
}

impl Policy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::StaticPattern => "static_pattern",
            Self::RouteBundle => "route_bundle",
            Self::SessionGate => "session_gate",
            Self::IdleTime => "idle_time",
            Self::HoverIntent => "hover_intent",
            Self::Visibility => "visibility",
        }
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
