//! Host-provided scheduling capabilities.
//!
//! The host decides when it has spare capacity. Hosts without an idle
//! primitive use [`NoIdleSupport`], and callers fall back to a short timer.

use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};
use tokio::sync::Notify;

/// Notification that the host runtime has spare capacity.
pub trait IdleSignal: Send + Sync {
    /// A future resolving at the next idle period, or `None` when the host
    /// has no idle primitive.
    fn idle(&self) -> Option<BoxFuture<'static, ()>>;
}

/// Host without an idle primitive.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoIdleSupport;

impl IdleSignal for NoIdleSupport {
    fn idle(&self) -> Option<BoxFuture<'static, ()>> {
        None
    }
}

/// Idle signal driven manually by the host event loop.
///
/// A signal raised before anyone waits is remembered for the next waiter.
#[derive(Debug, Clone, Default)]
pub struct IdleNotifier {
    notify: Arc<Notify>,
}

impl IdleNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report that the host is idle.
    pub fn signal_idle(&self) {
        self.notify.notify_one();
    }
}

impl IdleSignal for IdleNotifier {
    fn idle(&self) -> Option<BoxFuture<'static, ()>> {
        let notify = Arc::clone(&self.notify);
        Some(async move { notify.notified().await }.boxed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_idle_support_has_no_signal() {
        assert!(NoIdleSupport.idle().is_none());
    }

    #[tokio::test]
    async fn notifier_remembers_early_signal() {
        let notifier = IdleNotifier::new();
        notifier.signal_idle();
        let idle = notifier.idle().expect("notifier always provides a signal");
        tokio::time::timeout(std::time::Duration::from_millis(50), idle)
            .await
            .expect("stored permit resolves immediately");
    }
}
