//! Static pattern policy.
//!
//! A pattern `from → to` fires when the current route is `from` and the
//! effective probability `max(baseline, observed)` exceeds the threshold.
//! A target route is preloaded at most once per engine unless its preload
//! fails, in which case a later visit to `from` may schedule it again.

use std::sync::Arc;
use std::time::Duration;

use foresight_core::config::StrategyConfig;
use foresight_core::{ResourceKey, Route};
use tracing::{trace, Instrument};

use super::Policy;
use crate::engine::EngineInner;
use crate::plan::Pattern;
use crate::scheduled::ScheduledPreload;

/// Observed behaviour can raise a pattern above its baseline, never lower it.
pub fn effective_probability(baseline: f64, observed: f64) -> f64 {
    baseline.max(observed)
}

/// Delay before `pattern` should preload, or `None` if it should not fire.
pub fn evaluate(pattern: &Pattern, observed: f64, config: &StrategyConfig) -> Option<Duration> {
    let effective = effective_probability(pattern.baseline_probability, observed);
    if effective > config.probability_threshold {
        Some(
            pattern
                .delay_ms
                .map(Duration::from_millis)
                .unwrap_or_else(|| config.default_pattern_delay()),
        )
    } else {
        None
    }
}

impl<C, L, V> EngineInner<C, L, V>
where
    C: ResourceKey,
    L: ResourceKey,
    V: Clone + Send + Sync + 'static,
{
    /// Schedule preloads for every pattern leaving `route` that clears the
    /// threshold. Returns how many were scheduled.
    pub(crate) fn apply_static_patterns(self: &Arc<Self>, route: &Route) -> usize {
        let mut scheduled = 0;
        for pattern in self.plan.patterns_from(route.as_str()) {
            if self.preloaded_routes.contains(&pattern.to) {
                continue;
            }
            let observed = self
                .analytics
                .transition_probability(pattern.from.as_str(), pattern.to.as_str());
            let Some(delay) = evaluate(pattern, observed, &self.config) else {
                trace!(from = %pattern.from, to = %pattern.to, observed, "pattern below threshold");
                continue;
            };
            let Some(key) = self.plan.resource_for_route(pattern.to.as_str()) else {
                continue;
            };

            let weak = Arc::downgrade(self);
            let target = pattern.to.clone();
            let span = foresight_observability::strategy_span!(Policy::StaticPattern, target);
            let work = async move {
                let Some(inner) = weak.upgrade() else {
                    return;
                };
                if !inner.preloaded_routes.insert(target.clone()) {
                    return;
                }
                if !inner.preload_component(Policy::StaticPattern, key).await {
                    inner.preloaded_routes.remove(&target);
                }
            };
            self.schedule(
                route,
                ScheduledPreload::spawn(Policy::StaticPattern, delay, work.instrument(span)),
            );
            scheduled += 1;
        }
        scheduled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(baseline: f64) -> Pattern {
        Pattern::new("/", "/reports", baseline)
    }

    #[test]
    fn observed_probability_lifts_low_baseline() {
        let config = StrategyConfig::default();
        assert_eq!(evaluate(&pattern(0.2), 0.1, &config), None);
        assert_eq!(
            evaluate(&pattern(0.2), 0.5, &config),
            Some(config.default_pattern_delay())
        );
    }

    #[test]
    fn threshold_is_exclusive() {
        let config = StrategyConfig::default();
        assert_eq!(evaluate(&pattern(config.probability_threshold), 0.0, &config), None);
    }

    #[test]
    fn pattern_delay_overrides_default() {
        let config = StrategyConfig::default();
        let p = pattern(0.9).with_delay_ms(250);
        assert_eq!(evaluate(&p, 0.0, &config), Some(Duration::from_millis(250)));
    }
}
