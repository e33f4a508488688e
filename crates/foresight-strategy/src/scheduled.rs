//! Delayed preloads owned by whoever scheduled them.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::strategies::Policy;

/// A preload waiting on a timer. Dropping the handle cancels it.
///
/// Cancelling only stops work that has not started yet: once the timer has
/// fired, the load itself is driven by the cache and outlives this handle.
pub struct ScheduledPreload {
    policy: Policy,
    handle: JoinHandle<()>,
}

impl ScheduledPreload {
    /// Run `work` after `delay` on the current tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime, like `tokio::spawn`.
    pub fn spawn<F>(policy: Policy, delay: Duration, work: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            work.await;
        });
        Self { policy, handle }
    }

    pub fn policy(&self) -> Policy {
        self.policy
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    pub fn cancel(self) {
        drop(self);
    }
}

impl Drop for ScheduledPreload {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

impl fmt::Debug for ScheduledPreload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScheduledPreload")
            .field("policy", &self.policy)
            .field("finished", &self.is_finished())
            .finish()
    }
}
