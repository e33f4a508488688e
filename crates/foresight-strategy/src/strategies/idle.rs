//! Idle-time policy: heavy libraries load when the host has spare capacity,
//! or after a short fallback timer on hosts without an idle primitive.

use std::sync::Arc;
use std::time::Duration;

use foresight_core::ResourceKey;
use tracing::{debug, warn, Instrument};

use super::Policy;
use crate::engine::EngineInner;
use crate::scheduled::ScheduledPreload;

impl<C, L, V> EngineInner<C, L, V>
where
    C: ResourceKey,
    L: ResourceKey,
    V: Clone + Send + Sync + 'static,
{
    /// Wait once for idleness (or the fallback timer), then dispatch the
    /// heavy libraries. Armed once per `start()`: a heavy library that fails
    /// here is retried only after the next `start()` or an explicit load.
    pub(crate) fn arm_idle_preload(self: &Arc<Self>) -> Option<ScheduledPreload> {
        if self.plan.heavy_libraries.is_empty() {
            return None;
        }
        let idle = self.idle.idle();
        let fallback = self.config.idle_fallback();
        let weak = Arc::downgrade(self);
        let span = foresight_observability::strategy_span!(Policy::IdleTime, "*");
        let work = async move {
            match idle {
                Some(signal) => signal.await,
                None => tokio::time::sleep(fallback).await,
            }
            if let Some(inner) = weak.upgrade() {
                inner.preload_heavy_libraries();
            }
        };
        Some(ScheduledPreload::spawn(
            Policy::IdleTime,
            Duration::ZERO,
            work.instrument(span),
        ))
    }

    /// Background, unmetered preload of every heavy library not yet loaded.
    pub(crate) fn preload_heavy_libraries(&self) -> usize {
        let mut started = 0;
        for &name in &self.plan.heavy_libraries {
            if self.library_loader.is_loaded(&name) {
                continue;
            }
            match self.libraries.get(&name) {
                Ok(loader) => {
                    self.library_loader.preload_library(name, &loader);
                    started += 1;
                }
                Err(error) => warn!(%name, %error, "idle preload skipped"),
            }
        }
        debug!(started, "idle preload dispatched");
        started
    }
}
