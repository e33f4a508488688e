//! # foresight-cache
//!
//! Materializes resources exactly once per key.
//!
//! | Type | Role |
//! |------|------|
//! | [`SingleFlight`] | Generic memoized-task primitive; dedups concurrent loads, evicts failures |
//! | [`ResourceCache`] | Component namespace over `SingleFlight` |
//! | [`LibraryLoader`] | Shared-library namespace with metered loads and fire-and-forget preloads |
//! | [`RetryingLoader`] | Bounded retry with backoff around any loader, timing each top-level load |
//! | [`MetricsRecorder`] | Bounded history of load durations with aggregate stats |
//!
//! ## Per-key lifecycle
//!
//! `Unrequested → Pending → Loaded | Failed`. A failed entry is evicted, so the
//! key returns to `Unrequested` and the next request invokes its loader again.

pub mod library;
pub mod metrics;
pub mod resource_cache;
pub mod retry;
pub mod singleflight;

pub use library::LibraryLoader;
pub use metrics::{LoadId, LoadReport, Metric, MetricsRecorder, MetricsStats};
pub use resource_cache::ResourceCache;
pub use retry::{RetryPolicy, RetryingLoader};
pub use singleflight::{spawn_detached, CacheStats, PreloadTask, SingleFlight};
