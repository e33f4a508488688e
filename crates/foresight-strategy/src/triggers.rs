//! Direct UI triggers: hover/focus intent and first visibility.

use std::sync::atomic::{AtomicBool, Ordering};

use foresight_core::ResourceKey;
use futures::{Stream, StreamExt};
use tracing::trace;

use crate::engine::StrategyEngine;
use crate::strategies::Policy;

impl<C, L, V> StrategyEngine<C, L, V>
where
    C: ResourceKey,
    L: ResourceKey,
    V: Clone + Send + Sync + 'static,
{
    /// Pointer entered an element that leads to `key`. Preloads immediately
    /// unless already loaded; returns whether a load was requested.
    pub fn on_hover(&self, key: C) -> bool {
        self.inner.request_component(Policy::HoverIntent, key)
    }

    /// Keyboard focus equivalent of [`on_hover`](Self::on_hover).
    pub fn on_focus(&self, key: C) -> bool {
        self.inner.request_component(Policy::HoverIntent, key)
    }

    /// A trigger that preloads `key` the first time its element becomes
    /// visible.
    pub fn visibility_trigger(&self, key: C) -> VisibilityTrigger<C, L, V> {
        VisibilityTrigger {
            engine: self.clone(),
            key,
            engaged: AtomicBool::new(true),
        }
    }
}

/// Fires one preload on first visibility, then disengages for good.
pub struct VisibilityTrigger<C: ResourceKey, L: ResourceKey, V> {
    engine: StrategyEngine<C, L, V>,
    key: C,
    engaged: AtomicBool,
}

impl<C, L, V> VisibilityTrigger<C, L, V>
where
    C: ResourceKey,
    L: ResourceKey,
    V: Clone + Send + Sync + 'static,
{
    pub fn key(&self) -> C {
        self.key
    }

    /// Still waiting for the first visibility.
    pub fn is_engaged(&self) -> bool {
        self.engaged.load(Ordering::Acquire)
    }

    /// Report a visibility change. Returns `true` only for the change that
    /// fired the preload.
    pub fn on_visibility_change(&self, visible: bool) -> bool {
        if !visible {
            return false;
        }
        if !self.engaged.swap(false, Ordering::AcqRel) {
            return false;
        }
        trace!(key = %self.key, "first visibility");
        self.engine.inner.request_component(Policy::Visibility, self.key);
        true
    }

    /// Stop observing without firing.
    pub fn disengage(&self) {
        self.engaged.store(false, Ordering::Release);
    }

    /// Consume visibility changes until the trigger fires or the stream
    /// ends. Returns whether it fired.
    pub async fn observe<S>(&self, changes: S) -> bool
    where
        S: Stream<Item = bool>,
    {
        futures::pin_mut!(changes);
        while let Some(visible) = changes.next().await {
            if self.on_visibility_change(visible) {
                return true;
            }
            if !self.is_engaged() {
                return false;
            }
        }
        false
    }
}
