//! Load-timing metrics.
//!
//! One [`Metric`] per top-level load, never per retry. Finalized metrics live
//! in a ring buffer; when it is full the oldest record is dropped.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use dashmap::DashMap;
use foresight_core::config::MetricsConfig;
use serde::Serialize;
use tokio::time::Instant;

/// Timing of a single top-level load.
#[derive(Debug, Clone, Serialize)]
pub struct Metric {
    pub key: String,
    #[serde(skip)]
    pub started_at: Instant,
    #[serde(skip)]
    pub ended_at: Option<Instant>,
    pub duration: Option<Duration>,
}

/// Aggregates over finalized metrics. All zero when nothing has finished.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MetricsStats {
    pub count: usize,
    pub average_duration: Duration,
    pub min_duration: Duration,
    pub max_duration: Duration,
}

/// Millisecond summary polled by the UI layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct LoadReport {
    pub total_loaded: usize,
    pub average_load_time_ms: f64,
    pub fastest_load_ms: f64,
    pub slowest_load_ms: f64,
}

impl From<MetricsStats> for LoadReport {
    fn from(stats: MetricsStats) -> Self {
        Self {
            total_loaded: stats.count,
            average_load_time_ms: as_millis_f64(stats.average_duration),
            fastest_load_ms: as_millis_f64(stats.min_duration),
            slowest_load_ms: as_millis_f64(stats.max_duration),
        }
    }
}

fn as_millis_f64(d: Duration) -> f64 {
    d.as_secs_f64() * 1_000.0
}

/// Records load start/end times and aggregates durations.
/// Identifies one started load. Overlapping loads of the same key get
/// distinct ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoadId(u64);

#[derive(Debug)]
pub struct MetricsRecorder {
    pending: DashMap<LoadId, (String, Instant)>,
    next_id: AtomicU64,
    history: Mutex<VecDeque<Metric>>,
    capacity: usize,
}

impl MetricsRecorder {
    pub fn new(config: &MetricsConfig) -> Self {
        Self::with_capacity(config.history_capacity)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            pending: DashMap::new(),
            next_id: AtomicU64::new(0),
            history: Mutex::new(VecDeque::with_capacity(capacity.min(1_024))),
            capacity,
        }
    }

    /// Mark the start of a load for `key`. Pass the returned id to
    /// [`end`](Self::end).
    pub fn start(&self, key: &str) -> LoadId {
        let id = LoadId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.pending.insert(id, (key.to_string(), Instant::now()));
        id
    }

    /// Finalize the load started as `id`. Returns `None` if it was already
    /// finalized or discarded by [`reset`](Self::reset).
    pub fn end(&self, id: LoadId) -> Option<Duration> {
        let (_, (key, started_at)) = self.pending.remove(&id)?;
        let ended_at = Instant::now();
        let duration = ended_at.saturating_duration_since(started_at);
        self.push(Metric {
            key,
            started_at,
            ended_at: Some(ended_at),
            duration: Some(duration),
        });
        Some(duration)
    }

    /// Record a load timed elsewhere.
    pub fn record(&self, key: &str, duration: Duration) {
        let ended_at = Instant::now();
        self.push(Metric {
            key: key.to_string(),
            started_at: ended_at.checked_sub(duration).unwrap_or(ended_at),
            ended_at: Some(ended_at),
            duration: Some(duration),
        });
    }

    pub fn stats(&self) -> MetricsStats {
        let history = self.history();
        let durations = history.iter().filter_map(|m| m.duration);

        let mut count = 0usize;
        let mut total = Duration::ZERO;
        let mut min = Duration::MAX;
        let mut max = Duration::ZERO;
        for d in durations {
            count += 1;
            total += d;
            min = min.min(d);
            max = max.max(d);
        }

        if count == 0 {
            return MetricsStats::default();
        }
        MetricsStats {
            count,
            average_duration: total / count as u32,
            min_duration: min,
            max_duration: max,
        }
    }

    pub fn report(&self) -> LoadReport {
        self.stats().into()
    }

    /// Newest finalized metrics first.
    pub fn recent(&self, limit: usize) -> Vec<Metric> {
        self.history().iter().rev().take(limit).cloned().collect()
    }

    /// Loads started but not yet finalized.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn reset(&self) {
        self.pending.clear();
        self.history().clear();
    }

    fn push(&self, metric: Metric) {
        let mut history = self.history();
        if history.len() == self.capacity {
            history.pop_front();
        }
        history.push_back(metric);
    }

    fn history(&self) -> MutexGuard<'_, VecDeque<Metric>> {
        // A panic mid-push leaves the deque itself consistent.
        self.history.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new(&MetricsConfig::default())
    }
}
