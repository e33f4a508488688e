//! Strategy engine: turns navigation and UI events into preloads.
//!
//! The engine owns one cache per namespace, the retrying loader, and the
//! navigation analytics for a session. Everything is an explicit instance:
//! build one engine per session and share it by cloning.

use std::fmt::Display;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use dashmap::{DashMap, DashSet};
use foresight_analytics::NavigationAnalytics;
use foresight_cache::{
    spawn_detached, CacheStats, LibraryLoader, LoadReport, MetricsRecorder, PreloadTask,
    ResourceCache, RetryPolicy, RetryingLoader,
};
use foresight_core::config::StrategyConfig;
use foresight_core::{
    ConfigError, ForesightConfig, ForesightResult, IdleSignal, LoadError, LoaderRegistry,
    NoIdleSupport, ResourceKey, Route,
};
use serde::Serialize;
use tracing::{debug, info, warn, Instrument};

use crate::plan::PreloadPlan;
use crate::scheduled::ScheduledPreload;
use crate::strategies::Policy;

/// Point-in-time view of the engine for debugging UIs.
#[derive(Debug, Clone, Serialize)]
pub struct EngineStats {
    pub components: CacheStats,
    pub libraries: CacheStats,
    pub loads: LoadReport,
    pub session_duration_ms: u64,
    pub scheduled_preloads: usize,
    pub preloaded_routes: usize,
}

pub(crate) struct EngineInner<C: ResourceKey, L: ResourceKey, V> {
    pub(crate) config: StrategyConfig,
    pub(crate) plan: PreloadPlan<C, L>,
    pub(crate) components: LoaderRegistry<C, V>,
    pub(crate) libraries: LoaderRegistry<L, V>,
    pub(crate) cache: ResourceCache<C, V>,
    pub(crate) library_loader: LibraryLoader<L, V>,
    pub(crate) retrying: RetryingLoader,
    pub(crate) analytics: Arc<NavigationAnalytics>,
    pub(crate) idle: Arc<dyn IdleSignal>,
    /// Routes whose pattern preload has fired; never fired twice.
    pub(crate) preloaded_routes: DashSet<Route>,
    pub(crate) frequent_fired: AtomicBool,
    current_route: Mutex<Option<Route>>,
    /// Pending delayed preloads, owned by the route that scheduled them.
    scheduled: DashMap<Route, Vec<ScheduledPreload>>,
    background: Mutex<Vec<ScheduledPreload>>,
    started: AtomicBool,
}

impl<C, L, V> EngineInner<C, L, V>
where
    C: ResourceKey,
    L: ResourceKey,
    V: Clone + Send + Sync + 'static,
{
    /// Submit `key` to the component cache through the retrying loader.
    pub(crate) fn submit_component(&self, key: C) -> Result<PreloadTask<V>, LoadError> {
        let loader = self.components.get(&key)?;
        let wrapped = self.retrying.wrap(key, loader);
        Ok(self.cache.preload(key, &wrapped))
    }

    /// Submit `name` to the library loader as a metered load.
    pub(crate) fn submit_library(&self, name: L) -> Result<PreloadTask<V>, LoadError> {
        let loader = self.libraries.get(&name)?;
        Ok(self.library_loader.load_library(name, &loader))
    }

    /// Fire-and-forget component preload. Returns `false` when the key is
    /// already loaded or has no loader.
    pub(crate) fn request_component(&self, policy: Policy, key: C) -> bool {
        if self.cache.is_loaded(&key) {
            return false;
        }
        match self.submit_component(key) {
            Ok(task) => {
                let span = foresight_observability::trigger_span!(policy, key);
                let watched = async move {
                    watch(policy, key, task).await;
                };
                if !spawn_detached(watched.instrument(span)) {
                    debug!(%policy, %key, "no tokio runtime; preload outcome will not be logged");
                }
                true
            }
            Err(error) => {
                warn!(%policy, %key, %error, "preload not started");
                false
            }
        }
    }

    /// Preload `key` and wait for the outcome. Failures are logged, never
    /// returned.
    pub(crate) async fn preload_component(&self, policy: Policy, key: C) -> bool {
        if self.cache.is_loaded(&key) {
            return true;
        }
        match self.submit_component(key) {
            Ok(task) => watch(policy, key, task).await,
            Err(error) => {
                warn!(%policy, %key, %error, "preload not started");
                false
            }
        }
    }

    pub(crate) async fn load_library(&self, policy: Policy, name: L) -> bool {
        if self.library_loader.is_loaded(&name) {
            return true;
        }
        match self.submit_library(name) {
            Ok(task) => watch(policy, name, task).await,
            Err(error) => {
                warn!(%policy, %name, %error, "library preload not started");
                false
            }
        }
    }

    /// Attach a delayed preload to `route`; it is cancelled when the route is
    /// left.
    pub(crate) fn schedule(&self, route: &Route, preload: ScheduledPreload) {
        let mut pending = self.scheduled.entry(route.clone()).or_default();
        pending.retain(|p| !p.is_finished());
        pending.push(preload);
    }

    /// Cancel every delayed preload owned by `route`.
    pub(crate) fn dispose_route(&self, route: &str) -> usize {
        let Some((_, pending)) = self.scheduled.remove(route) else {
            return 0;
        };
        let cancelled = pending.iter().filter(|p| !p.is_finished()).count();
        if cancelled > 0 {
            debug!(route, cancelled, "cancelled scheduled preloads");
        }
        cancelled
    }

    fn scheduled_count(&self) -> usize {
        self.scheduled
            .iter()
            .map(|entry| entry.value().iter().filter(|p| !p.is_finished()).count())
            .sum()
    }

    fn current_route(&self) -> MutexGuard<'_, Option<Route>> {
        self.current_route
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn background(&self) -> MutexGuard<'_, Vec<ScheduledPreload>> {
        self.background.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Await `task` and log its outcome.
async fn watch<V: Clone>(policy: Policy, key: impl Display, task: PreloadTask<V>) -> bool {
    match task.await {
        Ok(_) => {
            debug!(%policy, %key, "preloaded");
            true
        }
        Err(error) => {
            warn!(%policy, %key, %error, "preload failed");
            false
        }
    }
}

/// Predictive preloading for one session.
///
/// Must be driven from within a tokio runtime: delayed policies run on
/// spawned timers.
pub struct StrategyEngine<C: ResourceKey, L: ResourceKey, V> {
    pub(crate) inner: Arc<EngineInner<C, L, V>>,
}

impl<C: ResourceKey, L: ResourceKey, V> Clone for StrategyEngine<C, L, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C, L, V> StrategyEngine<C, L, V>
where
    C: ResourceKey,
    L: ResourceKey,
    V: Clone + Send + Sync + 'static,
{
    pub fn builder(
        plan: PreloadPlan<C, L>,
        components: LoaderRegistry<C, V>,
        libraries: LoaderRegistry<L, V>,
    ) -> StrategyEngineBuilder<C, L, V> {
        StrategyEngineBuilder {
            plan,
            components,
            libraries,
            config: ForesightConfig::default(),
            idle: Arc::new(NoIdleSupport),
            analytics: None,
            metrics: None,
        }
    }

    /// Arm the session-gate timer and the idle-time preload. Idempotent
    /// until [`shutdown`](Self::shutdown).
    pub fn start(&self) {
        if self.inner.started.swap(true, Ordering::AcqRel) {
            return;
        }
        let mut background = self.inner.background();
        background.extend(self.inner.arm_session_gate());
        background.extend(self.inner.arm_idle_preload());
        info!(
            patterns = self.inner.plan.patterns.len(),
            bundles = self.inner.plan.bundles.len(),
            "strategy engine started"
        );
    }

    /// Feed a navigation to the engine and run every route-driven policy.
    ///
    /// The first call records a visit to the landing route; later calls
    /// record `previous → to` and cancel the previous route's pending
    /// preloads. Re-entering the current route does nothing.
    pub fn on_route_change(&self, to: impl Into<Route>) {
        let to = to.into();
        let previous = {
            let mut current = self.inner.current_route();
            if current.as_ref() == Some(&to) {
                return;
            }
            current.replace(to.clone())
        };

        match previous {
            Some(from) => {
                self.inner.dispose_route(from.as_str());
                self.inner.analytics.record_transition(from, to.clone());
            }
            None => self.inner.analytics.record_visit(to.clone()),
        }

        let patterns = self.inner.apply_static_patterns(&to);
        let bundle = self.inner.apply_bundle(&to);
        let gate = self.inner.check_session_gate();
        debug!(route = %to, patterns, bundle, gate, "route change handled");
    }

    pub fn current_route(&self) -> Option<Route> {
        self.inner.current_route().clone()
    }

    /// Cancel the pending preloads of the current route without entering a
    /// new one, e.g. when the host view unmounts.
    pub fn exit_route(&self) -> usize {
        let Some(route) = self.inner.current_route().take() else {
            return 0;
        };
        self.inner.dispose_route(route.as_str())
    }

    /// Explicit preload. Errors surface when the returned task is awaited;
    /// only a missing loader fails immediately.
    pub fn preload(&self, key: C) -> Result<PreloadTask<V>, LoadError> {
        self.inner.submit_component(key)
    }

    /// Explicit, metered library load.
    pub fn load_library(&self, name: L) -> Result<PreloadTask<V>, LoadError> {
        self.inner.submit_library(name)
    }

    pub fn is_loaded(&self, key: &C) -> bool {
        self.inner.cache.is_loaded(key)
    }

    pub fn is_library_loaded(&self, name: &L) -> bool {
        self.inner.library_loader.is_loaded(name)
    }

    /// Delayed preloads still waiting on their timers.
    pub fn scheduled_count(&self) -> usize {
        self.inner.scheduled_count()
    }

    pub fn cache(&self) -> &ResourceCache<C, V> {
        &self.inner.cache
    }

    pub fn library_loader(&self) -> &LibraryLoader<L, V> {
        &self.inner.library_loader
    }

    pub fn analytics(&self) -> &Arc<NavigationAnalytics> {
        &self.inner.analytics
    }

    pub fn metrics(&self) -> &Arc<MetricsRecorder> {
        self.inner.retrying.metrics()
    }

    pub fn plan(&self) -> &PreloadPlan<C, L> {
        &self.inner.plan
    }

    pub fn config(&self) -> &StrategyConfig {
        &self.inner.config
    }

    pub fn stats(&self) -> EngineStats {
        EngineStats {
            components: self.inner.cache.stats(),
            libraries: self.inner.library_loader.stats(),
            loads: self.metrics().report(),
            session_duration_ms: self.inner.analytics.session_duration().as_millis() as u64,
            scheduled_preloads: self.inner.scheduled_count(),
            preloaded_routes: self.inner.preloaded_routes.len(),
        }
    }

    /// Cancel every timer the engine owns. Loads already running finish on
    /// their own. The engine can be started again afterwards.
    pub fn shutdown(&self) {
        let background = std::mem::take(&mut *self.inner.background());
        let routes = self.inner.scheduled.len();
        self.inner.scheduled.clear();
        self.inner.started.store(false, Ordering::Release);
        info!(background = background.len(), routes, "strategy engine shut down");
    }
}

/// Builds a [`StrategyEngine`], checking the plan against the registries.
pub struct StrategyEngineBuilder<C: ResourceKey, L: ResourceKey, V> {
    plan: PreloadPlan<C, L>,
    components: LoaderRegistry<C, V>,
    libraries: LoaderRegistry<L, V>,
    config: ForesightConfig,
    idle: Arc<dyn IdleSignal>,
    analytics: Option<Arc<NavigationAnalytics>>,
    metrics: Option<Arc<MetricsRecorder>>,
}

impl<C, L, V> StrategyEngineBuilder<C, L, V>
where
    C: ResourceKey,
    L: ResourceKey,
    V: Clone + Send + Sync + 'static,
{
    pub fn config(mut self, config: ForesightConfig) -> Self {
        self.config = config;
        self
    }

    pub fn idle_signal(mut self, idle: impl IdleSignal + 'static) -> Self {
        self.idle = Arc::new(idle);
        self
    }

    /// Share analytics with another consumer instead of creating a fresh
    /// session.
    pub fn analytics(mut self, analytics: Arc<NavigationAnalytics>) -> Self {
        self.analytics = Some(analytics);
        self
    }

    pub fn metrics(mut self, metrics: Arc<MetricsRecorder>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn build(self) -> ForesightResult<StrategyEngine<C, L, V>> {
        self.config.validate()?;
        self.plan.validate()?;
        if let Some(key) = self
            .plan
            .referenced_resources()
            .into_iter()
            .find(|k| !self.components.contains(k))
        {
            return Err(ConfigError::InvalidValue {
                field: "plan".to_string(),
                reason: format!("no loader registered for component {key}"),
            }
            .into());
        }
        if let Some(name) = self
            .plan
            .referenced_libraries()
            .into_iter()
            .find(|k| !self.libraries.contains(k))
        {
            return Err(ConfigError::InvalidValue {
                field: "plan".to_string(),
                reason: format!("no loader registered for library {name}"),
            }
            .into());
        }

        let metrics = self
            .metrics
            .unwrap_or_else(|| Arc::new(MetricsRecorder::new(&self.config.metrics)));
        let retrying = RetryingLoader::new(RetryPolicy::new(self.config.retry.clone()), metrics);

        Ok(StrategyEngine {
            inner: Arc::new(EngineInner {
                config: self.config.strategy,
                plan: self.plan,
                components: self.components,
                libraries: self.libraries,
                cache: ResourceCache::new(),
                library_loader: LibraryLoader::new(retrying.clone()),
                retrying,
                analytics: self.analytics.unwrap_or_default(),
                idle: self.idle,
                preloaded_routes: DashSet::new(),
                frequent_fired: AtomicBool::new(false),
                current_route: Mutex::new(None),
                scheduled: DashMap::new(),
                background: Mutex::new(Vec::new()),
                started: AtomicBool::new(false),
            }),
        })
    }
}
