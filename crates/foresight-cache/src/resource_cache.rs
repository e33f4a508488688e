//! Component namespace over [`SingleFlight`].

use foresight_core::constants::COMPONENT_NAMESPACE;
use foresight_core::{Loader, ResourceKey};

use crate::singleflight::{CacheStats, PreloadTask, SingleFlight};

/// Memoizes component loads: one loader invocation per key per generation.
pub struct ResourceCache<K: ResourceKey, V> {
    flight: SingleFlight<K, V>,
}

impl<K, V> ResourceCache<K, V>
where
    K: ResourceKey,
    V: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            flight: SingleFlight::new(COMPONENT_NAMESPACE),
        }
    }

    /// Return the existing task for `key`, or invoke `loader` once and store
    /// its task.
    pub fn preload(&self, key: K, loader: &Loader<V>) -> PreloadTask<V> {
        self.flight.get_or_start(key, || loader.invoke())
    }

    pub fn is_loaded(&self, key: &K) -> bool {
        self.flight.is_loaded(key)
    }

    pub fn is_pending(&self, key: &K) -> bool {
        self.flight.is_pending(key)
    }

    pub fn loaded_keys(&self) -> Vec<K> {
        self.flight.loaded_keys()
    }

    pub fn clear(&self) {
        self.flight.clear();
    }

    pub fn stats(&self) -> CacheStats {
        self.flight.stats()
    }
}

impl<K, V> Default for ResourceCache<K, V>
where
    K: ResourceKey,
    V: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}
