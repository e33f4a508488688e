//! Serializable view of the navigation model for debugging displays.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use foresight_core::Route;
use serde::{Deserialize, Serialize};

/// One `from → to` counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionRecord {
    pub from: Route,
    pub to: Route,
    pub count: u64,
}

/// Point-in-time copy of the analytics counters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsSnapshot {
    pub session_started_at: DateTime<Utc>,
    pub session_duration_ms: u64,
    /// Sorted by `(from, to)`.
    pub transitions: Vec<TransitionRecord>,
    pub visits: BTreeMap<Route, u64>,
}

impl AnalyticsSnapshot {
    pub fn total_transitions(&self) -> u64 {
        self.transitions.iter().map(|t| t.count).sum()
    }

    /// Distinct routes seen as either an origin or a destination.
    pub fn distinct_routes(&self) -> usize {
        let mut routes: Vec<&Route> = self
            .transitions
            .iter()
            .flat_map(|t| [&t.from, &t.to])
            .chain(self.visits.keys())
            .collect();
        routes.sort();
        routes.dedup();
        routes.len()
    }
}
