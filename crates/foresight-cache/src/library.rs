//! Shared-library loads.
//!
//! Same dedup contract as [`ResourceCache`](crate::ResourceCache) over a
//! separate namespace. A rejected load is dropped from the memo immediately,
//! so the next request for that library invokes its loader again.

use foresight_core::constants::LIBRARY_NAMESPACE;
use foresight_core::{Loader, ResourceKey};
use futures::future::FutureExt;
use tracing::{debug, warn, Instrument};

use crate::retry::RetryingLoader;
use crate::singleflight::{spawn_detached, CacheStats, PreloadTask, SingleFlight};

/// Library-scoped singleflight with metered and fire-and-forget loads.
pub struct LibraryLoader<L: ResourceKey, V> {
    flight: SingleFlight<L, V>,
    retrying: RetryingLoader,
}

impl<L, V> LibraryLoader<L, V>
where
    L: ResourceKey,
    V: Clone + Send + Sync + 'static,
{
    pub fn new(retrying: RetryingLoader) -> Self {
        Self {
            flight: SingleFlight::new(LIBRARY_NAMESPACE),
            retrying,
        }
    }

    /// Load `name`, sharing any load already in flight. Timed by the metrics
    /// recorder only when this call starts the load; joining an in-flight
    /// [`preload_library`](Self::preload_library) records no metric.
    pub fn load_library(&self, name: L, loader: &Loader<V>) -> PreloadTask<V> {
        let retrying = &self.retrying;
        self.flight
            .get_or_start(name, || retrying.wrap(name, loader.clone()).invoke())
    }

    /// Start loading `name` in the background. The value is discarded, no
    /// metric is recorded, and failures are only logged.
    pub fn preload_library(&self, name: L, loader: &Loader<V>) {
        if self.flight.is_loaded(&name) {
            return;
        }
        let policy = self.retrying.policy().clone();
        let task = self.flight.get_or_start(name, || {
            let loader = loader.clone();
            async move {
                let key = name.to_string();
                policy.run(&key, &loader, policy.max_attempts()).await
            }
            .boxed()
        });

        let span = foresight_observability::library_span!(name);
        spawn_detached(
            async move {
                match task.await {
                    Ok(_) => debug!(%name, "library preloaded"),
                    Err(error) => warn!(%name, %error, "library preload failed"),
                }
            }
            .instrument(span),
        );
    }

    pub fn is_loaded(&self, name: &L) -> bool {
        self.flight.is_loaded(name)
    }

    pub fn is_pending(&self, name: &L) -> bool {
        self.flight.is_pending(name)
    }

    pub fn loaded_libraries(&self) -> Vec<L> {
        self.flight.loaded_keys()
    }

    pub fn clear(&self) {
        self.flight.clear();
    }

    pub fn stats(&self) -> CacheStats {
        self.flight.stats()
    }
}
