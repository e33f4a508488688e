//! Per-route bundle policy.
//!
//! Entering a route with a bundle preloads its components and libraries
//! after the bundle's priority delay. Keys fail independently.

use std::sync::Arc;

use foresight_core::{ResourceKey, Route};
use futures::future::{join, join_all};
use tracing::{debug, Instrument};

use super::Policy;
use crate::engine::EngineInner;
use crate::scheduled::ScheduledPreload;

impl<C, L, V> EngineInner<C, L, V>
where
    C: ResourceKey,
    L: ResourceKey,
    V: Clone + Send + Sync + 'static,
{
    /// Schedule the bundle for `route`, if it has one.
    pub(crate) fn apply_bundle(self: &Arc<Self>, route: &Route) -> bool {
        let Some(bundle) = self.plan.bundle_for(route.as_str()) else {
            return false;
        };
        let delay = bundle.priority.delay(&self.config.priority_delays);
        let weak = Arc::downgrade(self);
        let owner = route.clone();
        let span = foresight_observability::strategy_span!(Policy::RouteBundle, route);
        let work = async move {
            if let Some(inner) = weak.upgrade() {
                inner.run_bundle(&owner).await;
            }
        };
        self.schedule(
            route,
            ScheduledPreload::spawn(Policy::RouteBundle, delay, work.instrument(span)),
        );
        true
    }

    /// Preload every key of `route`'s bundle concurrently. Returns the number
    /// of keys that failed.
    pub(crate) async fn run_bundle(&self, route: &Route) -> usize {
        let Some(bundle) = self.plan.bundle_for(route.as_str()) else {
            return 0;
        };
        let components = join_all(
            bundle
                .resource_keys
                .iter()
                .map(|&key| self.preload_component(Policy::RouteBundle, key)),
        );
        let libraries = join_all(
            bundle
                .library_keys
                .iter()
                .map(|&name| self.load_library(Policy::RouteBundle, name)),
        );
        let (components, libraries) = join(components, libraries).await;

        let failed = components
            .iter()
            .chain(libraries.iter())
            .filter(|ok| !**ok)
            .count();
        debug!(
            %route,
            priority = ?bundle.priority,
            components = components.len(),
            libraries = libraries.len(),
            failed,
            "bundle preloaded"
        );
        failed
    }
}
