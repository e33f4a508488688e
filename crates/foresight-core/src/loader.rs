//! Loader functions and the typed loader registry.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};

use crate::errors::LoadError;
use crate::key::ResourceKey;

/// The boxed future a [`Loader`] produces for one attempt.
pub type LoadFuture<V> = BoxFuture<'static, Result<V, LoadError>>;

/// An opaque asynchronous function producing a resource.
///
/// Owned by the UI layer. Cloning is cheap; every clone invokes the same
/// function.
pub struct Loader<V> {
    f: Arc<dyn Fn() -> LoadFuture<V> + Send + Sync>,
}

impl<V: Send + 'static> Loader<V> {
    pub fn new<F, Fut>(f: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<V, LoadError>> + Send + 'static,
    {
        Self {
            f: Arc::new(move || f().boxed()),
        }
    }

    /// Start one load attempt.
    pub fn invoke(&self) -> LoadFuture<V> {
        (self.f)()
    }
}

impl<V> Clone for Loader<V> {
    fn clone(&self) -> Self {
        Self {
            f: Arc::clone(&self.f),
        }
    }
}

impl<V> fmt::Debug for Loader<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Loader").finish_non_exhaustive()
    }
}

/// Typed map from keys to their loaders, populated once at startup.
#[derive(Debug)]
pub struct LoaderRegistry<K: ResourceKey, V> {
    loaders: HashMap<K, Loader<V>>,
}

impl<K: ResourceKey, V: Send + 'static> LoaderRegistry<K, V> {
    pub fn new() -> Self {
        Self {
            loaders: HashMap::new(),
        }
    }

    /// Register (or replace) the loader for `key`.
    pub fn register(&mut self, key: K, loader: Loader<V>) -> &mut Self {
        self.loaders.insert(key, loader);
        self
    }

    /// Builder-style [`register`](Self::register).
    pub fn with(mut self, key: K, loader: Loader<V>) -> Self {
        self.loaders.insert(key, loader);
        self
    }

    /// Loader for `key`, or `LoadError::Unregistered`.
    pub fn get(&self, key: &K) -> Result<Loader<V>, LoadError> {
        self.loaders
            .get(key)
            .cloned()
            .ok_or_else(|| LoadError::Unregistered {
                key: key.to_string(),
            })
    }

    pub fn contains(&self, key: &K) -> bool {
        self.loaders.contains_key(key)
    }

    /// Declared keys that have no loader, in declaration order.
    pub fn missing(&self) -> Vec<K> {
        K::all()
            .iter()
            .copied()
            .filter(|k| !self.loaders.contains_key(k))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.loaders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loaders.is_empty()
    }
}

impl<K: ResourceKey, V: Send + 'static> Default for LoaderRegistry<K, V> {
    fn default() -> Self {
        Self::new()
    }
}
