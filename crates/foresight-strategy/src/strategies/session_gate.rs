//! Session-duration gate: once a session is long enough, preload the
//! resources most sessions end up using. Fires at most once per engine.

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use foresight_core::ResourceKey;
use tracing::{info, Instrument};

use super::Policy;
use crate::engine::EngineInner;
use crate::scheduled::ScheduledPreload;

pub fn gate_open(session: Duration, gate: Duration) -> bool {
    session > gate
}

impl<C, L, V> EngineInner<C, L, V>
where
    C: ResourceKey,
    L: ResourceKey,
    V: Clone + Send + Sync + 'static,
{
    /// Preload the frequent resources if the gate has opened and has not
    /// fired yet.
    pub(crate) fn check_session_gate(&self) -> bool {
        if self.frequent_fired.load(Ordering::Acquire) {
            return false;
        }
        if !gate_open(self.analytics.session_duration(), self.config.session_gate()) {
            return false;
        }
        if self.frequent_fired.swap(true, Ordering::AcqRel) {
            return false;
        }
        info!(
            resources = self.plan.frequent_resources.len(),
            "session gate passed; preloading frequent resources"
        );
        for &key in &self.plan.frequent_resources {
            self.request_component(Policy::SessionGate, key);
        }
        true
    }

    /// Timer that re-checks the gate just after it opens, for sessions that
    /// stop navigating.
    pub(crate) fn arm_session_gate(self: &Arc<Self>) -> Option<ScheduledPreload> {
        if self.frequent_fired.load(Ordering::Acquire) || self.plan.frequent_resources.is_empty() {
            return None;
        }
        let remaining = self
            .config
            .session_gate()
            .saturating_sub(self.analytics.session_duration())
            + Duration::from_millis(1);
        let weak = Arc::downgrade(self);
        let span = foresight_observability::strategy_span!(Policy::SessionGate, "*");
        let work = async move {
            if let Some(inner) = weak.upgrade() {
                inner.check_session_gate();
            }
        };
        Some(ScheduledPreload::spawn(
            Policy::SessionGate,
            remaining,
            work.instrument(span),
        ))
    }
}
