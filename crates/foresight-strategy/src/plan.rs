//! Static preload configuration, read once when the engine is built.

use std::collections::BTreeMap;

use foresight_core::{ConfigError, Priority, ResourceKey, Route};
use serde::{Deserialize, Serialize};

/// A known navigation path worth preloading ahead of.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pattern {
    pub from: Route,
    pub to: Route,
    /// Probability assumed before any navigation has been observed.
    pub baseline_probability: f64,
    /// Delay before preloading; the configured default when unset.
    #[serde(default)]
    pub delay_ms: Option<u64>,
}

impl Pattern {
    pub fn new(from: impl Into<Route>, to: impl Into<Route>, baseline_probability: f64) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            baseline_probability,
            delay_ms: None,
        }
    }

    pub fn with_delay_ms(mut self, delay_ms: u64) -> Self {
        self.delay_ms = Some(delay_ms);
        self
    }
}

/// Resources to preload whenever a route is entered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyBundle<C: ResourceKey, L: ResourceKey> {
    pub route: Route,
    #[serde(default = "Vec::new")]
    pub resource_keys: Vec<C>,
    #[serde(default = "Vec::new")]
    pub library_keys: Vec<L>,
    pub priority: Priority,
}

impl<C: ResourceKey, L: ResourceKey> StrategyBundle<C, L> {
    pub fn new(route: impl Into<Route>, priority: Priority) -> Self {
        Self {
            route: route.into(),
            resource_keys: Vec::new(),
            library_keys: Vec::new(),
            priority,
        }
    }

    pub fn resources(mut self, keys: impl IntoIterator<Item = C>) -> Self {
        self.resource_keys.extend(keys);
        self
    }

    pub fn libraries(mut self, keys: impl IntoIterator<Item = L>) -> Self {
        self.library_keys.extend(keys);
        self
    }
}

/// Everything the strategy engine knows about the application up front.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreloadPlan<C: ResourceKey, L: ResourceKey> {
    #[serde(default = "Vec::new")]
    pub patterns: Vec<Pattern>,
    #[serde(default = "Vec::new")]
    pub bundles: Vec<StrategyBundle<C, L>>,
    /// Component that renders each route; pattern targets resolve here.
    #[serde(default = "BTreeMap::new")]
    pub route_resources: BTreeMap<Route, C>,
    /// Preloaded once the session passes the session gate.
    #[serde(default = "Vec::new")]
    pub frequent_resources: Vec<C>,
    /// Preloaded when the host is idle.
    #[serde(default = "Vec::new")]
    pub heavy_libraries: Vec<L>,
}

impl<C: ResourceKey, L: ResourceKey> PreloadPlan<C, L> {
    pub fn new() -> Self {
        Self {
            patterns: Vec::new(),
            bundles: Vec::new(),
            route_resources: BTreeMap::new(),
            frequent_resources: Vec::new(),
            heavy_libraries: Vec::new(),
        }
    }

    pub fn with_pattern(mut self, pattern: Pattern) -> Self {
        self.patterns.push(pattern);
        self
    }

    pub fn with_bundle(mut self, bundle: StrategyBundle<C, L>) -> Self {
        self.bundles.push(bundle);
        self
    }

    pub fn with_route(mut self, route: impl Into<Route>, component: C) -> Self {
        self.route_resources.insert(route.into(), component);
        self
    }

    pub fn with_frequent(mut self, keys: impl IntoIterator<Item = C>) -> Self {
        self.frequent_resources.extend(keys);
        self
    }

    pub fn with_heavy_libraries(mut self, keys: impl IntoIterator<Item = L>) -> Self {
        self.heavy_libraries.extend(keys);
        self
    }

    /// Parse and validate a TOML plan.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError>
    where
        C: for<'de> Deserialize<'de>,
        L: for<'de> Deserialize<'de>,
    {
        let plan: Self = toml::from_str(s).map_err(|e| ConfigError::Parse {
            reason: e.to_string(),
        })?;
        plan.validate()?;
        Ok(plan)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for pattern in &self.patterns {
            if !(0.0..=1.0).contains(&pattern.baseline_probability) {
                return Err(ConfigError::InvalidProbability {
                    field: format!("pattern {} -> {} baseline", pattern.from, pattern.to),
                    value: pattern.baseline_probability,
                });
            }
            if !self.route_resources.contains_key(&pattern.to) {
                return Err(ConfigError::UnmappedRoute {
                    from: pattern.from.to_string(),
                    to: pattern.to.to_string(),
                });
            }
        }
        let mut seen: Vec<&Route> = Vec::with_capacity(self.bundles.len());
        for bundle in &self.bundles {
            if seen.contains(&&bundle.route) {
                return Err(ConfigError::InvalidValue {
                    field: format!("bundles[{}]", bundle.route),
                    reason: "only one bundle per route".to_string(),
                });
            }
            seen.push(&bundle.route);
        }
        Ok(())
    }

    /// Patterns starting at `route`.
    pub fn patterns_from<'a>(&'a self, route: &'a str) -> impl Iterator<Item = &'a Pattern> + 'a {
        self.patterns
            .iter()
            .filter(move |p| p.from.as_str() == route)
    }

    pub fn bundle_for(&self, route: &str) -> Option<&StrategyBundle<C, L>> {
        self.bundles.iter().find(|b| b.route.as_str() == route)
    }

    pub fn resource_for_route(&self, route: &str) -> Option<C> {
        self.route_resources.get(route).copied()
    }

    /// Every component key the plan may preload, deduplicated.
    pub fn referenced_resources(&self) -> Vec<C> {
        let mut keys: Vec<C> = self
            .route_resources
            .values()
            .copied()
            .chain(self.bundles.iter().flat_map(|b| b.resource_keys.iter().copied()))
            .chain(self.frequent_resources.iter().copied())
            .collect();
        keys.sort();
        keys.dedup();
        keys
    }

    /// Every library key the plan may preload, deduplicated.
    pub fn referenced_libraries(&self) -> Vec<L> {
        let mut keys: Vec<L> = self
            .bundles
            .iter()
            .flat_map(|b| b.library_keys.iter().copied())
            .chain(self.heavy_libraries.iter().copied())
            .collect();
        keys.sort();
        keys.dedup();
        keys
    }
}

impl<C: ResourceKey, L: ResourceKey> Default for PreloadPlan<C, L> {
    fn default() -> Self {
        Self::new()
    }
}
