//! Bounded retry with backoff.
//!
//! The default schedule is linear: the wait before attempt `n + 1` is
//! `base × n`, so three attempts with a 1s base wait 1s then 2s.

use std::fmt::Display;
use std::sync::Arc;
use std::time::Duration;

use foresight_core::config::RetryConfig;
use foresight_core::{LoadError, Loader};
use tracing::{debug, warn, Instrument};

use crate::metrics::MetricsRecorder;

/// Attempt count and backoff schedule. Records nothing.
#[derive(Debug, Clone, Default)]
pub struct RetryPolicy {
    config: RetryConfig,
}

impl RetryPolicy {
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    pub fn max_attempts(&self) -> u32 {
        self.config.max_attempts.max(1)
    }

    /// Wait inserted before retry number `retry` (1-based).
    pub fn backoff_delay(&self, retry: u32) -> Duration {
        self.config.backoff_delay(retry)
    }

    /// Invoke `loader` up to `max_attempts` times, sleeping between attempts.
    pub async fn run<V>(
        &self,
        key: &str,
        loader: &Loader<V>,
        max_attempts: u32,
    ) -> Result<V, LoadError>
    where
        V: Send + 'static,
    {
        let max_attempts = max_attempts.max(1);
        let mut last_error = None;

        for attempt in 1..=max_attempts {
            if attempt > 1 {
                let delay = self.backoff_delay(attempt - 1);
                debug!(key, attempt, delay_ms = delay.as_millis() as u64, "backing off");
                tokio::time::sleep(delay).await;
            }
            match loader.invoke().await {
                Ok(value) => {
                    if attempt > 1 {
                        debug!(key, attempt, "load succeeded after retry");
                    }
                    return Ok(value);
                }
                Err(error) => {
                    warn!(key, attempt, max_attempts, %error, "load attempt failed");
                    last_error = Some(error);
                }
            }
        }

        Err(LoadError::Exhausted {
            key: key.to_string(),
            attempts: max_attempts,
            last_error: Box::new(
                last_error.unwrap_or_else(|| LoadError::failed("no attempt was made")),
            ),
        })
    }
}

/// A [`RetryPolicy`] that times every top-level load.
///
/// `start` is recorded before the first attempt and `end` exactly once after
/// the final success or failure; intermediate retries record nothing.
#[derive(Debug, Clone)]
pub struct RetryingLoader {
    policy: RetryPolicy,
    metrics: Arc<MetricsRecorder>,
}

impl RetryingLoader {
    pub fn new(policy: RetryPolicy, metrics: Arc<MetricsRecorder>) -> Self {
        Self { policy, metrics }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn metrics(&self) -> &Arc<MetricsRecorder> {
        &self.metrics
    }

    /// Load with the configured attempt count.
    pub async fn load<V>(&self, key: &str, loader: &Loader<V>) -> Result<V, LoadError>
    where
        V: Send + 'static,
    {
        self.load_with_attempts(key, loader, self.policy.max_attempts())
            .await
    }

    pub async fn load_with_attempts<V>(
        &self,
        key: &str,
        loader: &Loader<V>,
        max_attempts: u32,
    ) -> Result<V, LoadError>
    where
        V: Send + 'static,
    {
        let span = foresight_observability::retry_span!(key, max_attempts);
        let load = self.metrics.start(key);
        let result = self
            .policy
            .run(key, loader, max_attempts)
            .instrument(span)
            .await;
        if let Some(elapsed) = self.metrics.end(load) {
            debug!(key, ok = result.is_ok(), elapsed_ms = elapsed.as_millis() as u64, "load finished");
        }
        result
    }

    /// A loader whose every invocation is a full retrying, timed load.
    pub fn wrap<V>(&self, key: impl Display, loader: Loader<V>) -> Loader<V>
    where
        V: Send + 'static,
    {
        let this = self.clone();
        let key = key.to_string();
        Loader::new(move || {
            let this = this.clone();
            let key = key.clone();
            let loader = loader.clone();
            async move { this.load(&key, &loader).await }
        })
    }
}
