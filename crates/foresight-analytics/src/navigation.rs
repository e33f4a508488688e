//! Transition table and visit counts for one session.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use foresight_core::constants::DEFAULT_NEXT_ROUTE_LIMIT;
use foresight_core::Route;
use serde::Serialize;
use tokio::time::Instant;
use tracing::trace;

use crate::snapshot::{AnalyticsSnapshot, TransitionRecord};

#[derive(Debug, Clone, Copy)]
struct TransitionCounter {
    count: u64,
    /// Global observation sequence of the first `from → to` event; ranks ties.
    first_seen: u64,
}

/// A candidate next route with its observed likelihood.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedRoute {
    pub route: Route,
    pub count: u64,
    pub probability: f64,
}

/// Session-scoped navigation counters. Counts only ever grow.
#[derive(Debug)]
pub struct NavigationAnalytics {
    transitions: DashMap<Route, HashMap<Route, TransitionCounter>>,
    visits: DashMap<Route, u64>,
    sequence: AtomicU64,
    session_start: Instant,
    session_started_at: DateTime<Utc>,
}

impl NavigationAnalytics {
    pub fn new() -> Self {
        Self {
            transitions: DashMap::new(),
            visits: DashMap::new(),
            sequence: AtomicU64::new(0),
            session_start: Instant::now(),
            session_started_at: Utc::now(),
        }
    }

    /// Record a route change. Visible to every read that follows.
    pub fn record_transition(&self, from: impl Into<Route>, to: impl Into<Route>) {
        let (from, to) = (from.into(), to.into());
        let seq = self.sequence.fetch_add(1, Ordering::Relaxed);
        {
            let mut targets = self.transitions.entry(from.clone()).or_default();
            targets
                .entry(to.clone())
                .and_modify(|c| c.count += 1)
                .or_insert(TransitionCounter {
                    count: 1,
                    first_seen: seq,
                });
        }
        *self.visits.entry(to.clone()).or_insert(0) += 1;
        trace!(%from, %to, "transition recorded");
    }

    /// Record arrival at a route with no predecessor (the landing route).
    pub fn record_visit(&self, route: impl Into<Route>) {
        *self.visits.entry(route.into()).or_insert(0) += 1;
    }

    /// `count(from, to) / Σ count(from, *)`, or 0.0 when `from` has no
    /// recorded transitions.
    pub fn transition_probability(&self, from: &str, to: &str) -> f64 {
        let Some(targets) = self.transitions.get(from) else {
            return 0.0;
        };
        let total: u64 = targets.values().map(|c| c.count).sum();
        if total == 0 {
            return 0.0;
        }
        let count = targets.get(to).map(|c| c.count).unwrap_or(0);
        count as f64 / total as f64
    }

    pub fn transition_count(&self, from: &str, to: &str) -> u64 {
        self.transitions
            .get(from)
            .and_then(|targets| targets.get(to).map(|c| c.count))
            .unwrap_or(0)
    }

    /// Observed successors of `from`, most frequent first; ties go to the
    /// successor observed first.
    pub fn most_likely_next_routes(&self, from: &str, limit: usize) -> Vec<Route> {
        self.ranked_next_routes(from, limit)
            .into_iter()
            .map(|r| r.route)
            .collect()
    }

    /// [`most_likely_next_routes`](Self::most_likely_next_routes) with the
    /// default limit.
    pub fn likely_next_routes(&self, from: &str) -> Vec<Route> {
        self.most_likely_next_routes(from, DEFAULT_NEXT_ROUTE_LIMIT)
    }

    /// Ranked successors with counts and probabilities.
    pub fn ranked_next_routes(&self, from: &str, limit: usize) -> Vec<RankedRoute> {
        let Some(targets) = self.transitions.get(from) else {
            return Vec::new();
        };
        let total: u64 = targets.values().map(|c| c.count).sum();

        let mut ranked: Vec<(&Route, &TransitionCounter)> = targets.iter().collect();
        ranked.sort_by(|a, b| {
            b.1.count
                .cmp(&a.1.count)
                .then(a.1.first_seen.cmp(&b.1.first_seen))
        });
        ranked
            .into_iter()
            .take(limit)
            .map(|(route, c)| RankedRoute {
                route: route.clone(),
                count: c.count,
                probability: if total == 0 {
                    0.0
                } else {
                    c.count as f64 / total as f64
                },
            })
            .collect()
    }

    pub fn visit_count(&self, route: &str) -> u64 {
        self.visits.get(route).map(|v| *v).unwrap_or(0)
    }

    /// Most visited routes, descending; ties sorted by route.
    pub fn most_visited_routes(&self, limit: usize) -> Vec<(Route, u64)> {
        let mut sorted: Vec<(Route, u64)> = self
            .visits
            .iter()
            .map(|e| (e.key().clone(), *e.value()))
            .collect();
        sorted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        sorted.truncate(limit);
        sorted
    }

    /// Time since this analytics instance was created.
    pub fn session_duration(&self) -> Duration {
        self.session_start.elapsed()
    }

    pub fn session_started_at(&self) -> DateTime<Utc> {
        self.session_started_at
    }

    /// Point-in-time copy of all counters, ordered for stable output.
    pub fn snapshot(&self) -> AnalyticsSnapshot {
        let mut transitions: Vec<TransitionRecord> = self
            .transitions
            .iter()
            .flat_map(|entry| {
                let from = entry.key().clone();
                entry
                    .value()
                    .iter()
                    .map(|(to, c)| TransitionRecord {
                        from: from.clone(),
                        to: to.clone(),
                        count: c.count,
                    })
                    .collect::<Vec<_>>()
            })
            .collect();
        transitions.sort_by(|a, b| a.from.cmp(&b.from).then_with(|| a.to.cmp(&b.to)));

        let visits: BTreeMap<Route, u64> = self
            .visits
            .iter()
            .map(|e| (e.key().clone(), *e.value()))
            .collect();

        AnalyticsSnapshot {
            session_started_at: self.session_started_at,
            session_duration_ms: self.session_duration().as_millis() as u64,
            transitions,
            visits,
        }
    }
}

impl Default for NavigationAnalytics {
    fn default() -> Self {
        Self::new()
    }
}
