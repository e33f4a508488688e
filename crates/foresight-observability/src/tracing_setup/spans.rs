//! Span definitions per operation: preload, retry, library, strategy, trigger.
//!
//! Each span carries the key or route it operates on via the `tracing` crate.

/// Create a singleflight preload span.
#[macro_export]
macro_rules! preload_span {
    ($namespace:expr, $key:expr) => {
        tracing::debug_span!("foresight.preload", namespace = %$namespace, key = %$key)
    };
}

/// Create a retrying-load span.
#[macro_export]
macro_rules! retry_span {
    ($key:expr, $max_attempts:expr) => {
        tracing::debug_span!("foresight.retry", key = %$key, max_attempts = $max_attempts)
    };
}

/// Create a shared-library load span.
#[macro_export]
macro_rules! library_span {
    ($name:expr) => {
        tracing::debug_span!("foresight.library", name = %$name)
    };
}

/// Create a strategy policy span.
#[macro_export]
macro_rules! strategy_span {
    ($policy:expr, $route:expr) => {
        tracing::info_span!("foresight.strategy", policy = %$policy, route = %$route)
    };
}

/// Create a UI trigger span.
#[macro_export]
macro_rules! trigger_span {
    ($trigger:expr, $key:expr) => {
        tracing::debug_span!("foresight.trigger", trigger = %$trigger, key = %$key)
    };
}

/// Span names as constants for programmatic use.
pub mod names {
    pub const PRELOAD: &str = "foresight.preload";
    pub const RETRY: &str = "foresight.retry";
    pub const LIBRARY: &str = "foresight.library";
    pub const STRATEGY: &str = "foresight.strategy";
    pub const TRIGGER: &str = "foresight.trigger";
}
