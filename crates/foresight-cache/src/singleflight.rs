//! Generic memoized-task primitive.
//!
//! At most one non-evicted entry exists per key. Concurrent requests for a
//! pending key share its task; the loader runs once per generation. A task
//! that fails evicts its own entry, so the next request starts a new
//! generation. A task only touches the entry of its own generation, which
//! keeps late completions from clobbering entries created after `clear()`.

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::task::{Context, Poll};

use dashmap::mapref::entry::Entry;
use dashmap::{DashMap, DashSet};
use foresight_core::{LoadError, LoadFuture, ResourceKey};
use futures::future::{FutureExt, Shared};
use serde::Serialize;
use tracing::{debug, Instrument};

/// Handle to a pending or resolved load. Every clone yields the same result.
pub struct PreloadTask<V> {
    inner: Shared<LoadFuture<V>>,
}

impl<V: Clone> PreloadTask<V> {
    /// The result, if the load has already finished.
    pub fn peek(&self) -> Option<&Result<V, LoadError>> {
        self.inner.peek()
    }

    pub fn is_finished(&self) -> bool {
        self.peek().is_some()
    }
}

impl<V> Clone for PreloadTask<V> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<V: Clone> Future for PreloadTask<V> {
    type Output = Result<V, LoadError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.inner).poll(cx)
    }
}

/// Entry counts for one namespace.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Live entries, pending or loaded.
    pub cached_count: usize,
    /// Entries whose task resolved successfully.
    pub loaded_count: usize,
    /// Distinct keys ever requested since the last `clear()`.
    pub requested_count: usize,
}

struct CacheEntry<V> {
    generation: u64,
    task: PreloadTask<V>,
    loaded: bool,
}

struct Inner<K: ResourceKey, V> {
    namespace: &'static str,
    entries: DashMap<K, CacheEntry<V>>,
    requested: DashSet<K>,
    next_generation: AtomicU64,
}

impl<K: ResourceKey, V> Inner<K, V> {
    fn mark_as_loaded(&self, key: K, generation: u64) {
        if let Some(mut entry) = self.entries.get_mut(&key) {
            if entry.generation == generation {
                entry.loaded = true;
                debug!(namespace = self.namespace, %key, generation, "loaded");
            }
        }
    }

    fn evict(&self, key: K, generation: u64, error: &LoadError) {
        let evicted = self
            .entries
            .remove_if(&key, |_, entry| entry.generation == generation)
            .is_some();
        if evicted {
            debug!(namespace = self.namespace, %key, generation, %error, "evicted failed entry");
        }
    }
}

/// Deduplicates concurrent loads per key within one namespace.
pub struct SingleFlight<K: ResourceKey, V> {
    inner: Arc<Inner<K, V>>,
}

impl<K, V> SingleFlight<K, V>
where
    K: ResourceKey,
    V: Clone + Send + Sync + 'static,
{
    pub fn new(namespace: &'static str) -> Self {
        Self {
            inner: Arc::new(Inner {
                namespace,
                entries: DashMap::new(),
                requested: DashSet::new(),
                next_generation: AtomicU64::new(0),
            }),
        }
    }

    pub fn namespace(&self) -> &'static str {
        self.inner.namespace
    }

    /// Return the live task for `key`, or call `start` once and memoize it.
    ///
    /// `start` runs while the key's slot is locked and must not call back
    /// into this `SingleFlight`. New tasks are driven on the current tokio
    /// runtime, so they make progress even if every handle is dropped.
    pub fn get_or_start<F>(&self, key: K, start: F) -> PreloadTask<V>
    where
        F: FnOnce() -> LoadFuture<V>,
    {
        self.inner.requested.insert(key);

        let task = match self.inner.entries.entry(key) {
            Entry::Occupied(entry) => {
                debug!(namespace = self.inner.namespace, %key, "joined existing load");
                return entry.get().task.clone();
            }
            Entry::Vacant(slot) => {
                let generation = self.inner.next_generation.fetch_add(1, Ordering::Relaxed);
                let task = self.track(key, generation, start());
                slot.insert(CacheEntry {
                    generation,
                    task: task.clone(),
                    loaded: false,
                });
                task
            }
        };

        let span = foresight_observability::preload_span!(self.inner.namespace, key);
        spawn_detached(task.clone().map(drop).instrument(span));
        task
    }

    /// The live task for `key`, if any.
    pub fn get(&self, key: &K) -> Option<PreloadTask<V>> {
        self.inner.entries.get(key).map(|e| e.task.clone())
    }

    /// True only once the key's current task has resolved successfully.
    pub fn is_loaded(&self, key: &K) -> bool {
        self.inner
            .entries
            .get(key)
            .map(|e| e.loaded)
            .unwrap_or(false)
    }

    /// True while a task for `key` is stored but not yet loaded.
    pub fn is_pending(&self, key: &K) -> bool {
        self.inner
            .entries
            .get(key)
            .map(|e| !e.loaded)
            .unwrap_or(false)
    }

    /// Loaded keys, sorted.
    pub fn loaded_keys(&self) -> Vec<K> {
        let mut keys: Vec<K> = self
            .inner
            .entries
            .iter()
            .filter(|e| e.loaded)
            .map(|e| *e.key())
            .collect();
        keys.sort();
        keys
    }

    /// Remove every entry. Tasks still in flight finish without touching
    /// entries created afterwards.
    pub fn clear(&self) {
        self.inner.entries.clear();
        self.inner.requested.clear();
    }

    pub fn stats(&self) -> CacheStats {
        let mut stats = CacheStats {
            requested_count: self.inner.requested.len(),
            ..CacheStats::default()
        };
        for entry in self.inner.entries.iter() {
            stats.cached_count += 1;
            if entry.loaded {
                stats.loaded_count += 1;
            }
        }
        stats
    }

    fn track(&self, key: K, generation: u64, load: LoadFuture<V>) -> PreloadTask<V> {
        let inner: Weak<Inner<K, V>> = Arc::downgrade(&self.inner);
        let tracked = async move {
            let result = match AssertUnwindSafe(load).catch_unwind().await {
                Ok(result) => result,
                Err(_) => Err(LoadError::Aborted {
                    key: key.to_string(),
                    reason: "loader panicked".to_string(),
                }),
            };
            if let Some(inner) = inner.upgrade() {
                match &result {
                    Ok(_) => inner.mark_as_loaded(key, generation),
                    Err(error) => inner.evict(key, generation, error),
                }
            }
            result
        };
        PreloadTask {
            inner: tracked.boxed().shared(),
        }
    }
}

impl<K: ResourceKey, V> Clone for SingleFlight<K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

/// Spawn `fut` on the current tokio runtime, if there is one. Returns
/// `false` (and drops `fut`) outside a runtime.
pub fn spawn_detached<F>(fut: F) -> bool
where
    F: Future<Output = ()> + Send + 'static,
{
    match tokio::runtime::Handle::try_current() {
        Ok(handle) => {
            handle.spawn(fut);
            true
        }
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use foresight_core::Loader;
    use std::sync::atomic::AtomicUsize;

    foresight_core::resource_keys! {
        enum Key {
            A => "a",
            B => "b",
        }
    }

    fn counting_loader(calls: Arc<AtomicUsize>, ok: bool) -> Loader<u32> {
        Loader::new(move || {
            let calls = Arc::clone(&calls);
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                if ok {
                    Ok(1)
                } else {
                    Err(LoadError::failed("boom"))
                }
            }
        })
    }

    #[tokio::test]
    async fn failed_entry_is_evicted() {
        let flight = SingleFlight::<Key, u32>::new("test");
        let calls = Arc::new(AtomicUsize::new(0));
        let loader = counting_loader(Arc::clone(&calls), false);

        assert!(flight.get_or_start(Key::A, || loader.invoke()).await.is_err());
        assert!(flight.get(&Key::A).is_none());
        assert!(!flight.is_loaded(&Key::A));

        assert!(flight.get_or_start(Key::A, || loader.invoke()).await.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn stale_generation_does_not_touch_new_entry() {
        let flight = SingleFlight::<Key, u32>::new("test");
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();
        let gated = Loader::new({
            let rx = Arc::new(std::sync::Mutex::new(Some(rx)));
            move || {
                let rx = rx.lock().unwrap().take();
                async move {
                    if let Some(rx) = rx {
                        let _ = rx.await;
                    }
                    Err(LoadError::failed("late failure"))
                }
            }
        });

        let stale = flight.get_or_start(Key::B, || gated.invoke());
        flight.clear();
        let fresh = flight.get_or_start(Key::B, || Loader::new(|| async { Ok(9) }).invoke());
        assert_eq!(fresh.await.unwrap(), 9);

        tx.send(()).unwrap();
        assert!(stale.await.is_err());
        assert!(flight.is_loaded(&Key::B));
    }

    #[tokio::test]
    async fn panicking_loader_is_reported_as_aborted() {
        let flight = SingleFlight::<Key, u32>::new("test");
        let loader: Loader<u32> = Loader::new(|| async {
            let broken = true;
            if broken {
                panic!("loader bug");
            }
            Ok(0)
        });
        let err = flight.get_or_start(Key::A, || loader.invoke()).await.unwrap_err();
        assert!(matches!(err, LoadError::Aborted { .. }));
        assert!(flight.get(&Key::A).is_none());
    }

    #[test]
    fn without_runtime_task_is_lazy() {
        let flight = SingleFlight::<Key, u32>::new("test");
        let calls = Arc::new(AtomicUsize::new(0));
        let loader = counting_loader(Arc::clone(&calls), true);
        let task = flight.get_or_start(Key::A, || loader.invoke());
        assert_eq!(futures::executor::block_on(task).unwrap(), 1);
        assert!(flight.is_loaded(&Key::A));
    }

    #[test]
    fn spawn_detached_needs_a_runtime() {
        assert!(!spawn_detached(async {}));

        let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
        let ran = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&ran);
        rt.block_on(async move {
            assert!(spawn_detached(async move {
                counter.fetch_add(1, Ordering::SeqCst);
            }));
            tokio::task::yield_now().await;
        });
        assert_eq!(ran.load(Ordering::SeqCst), 1);
    }
}
