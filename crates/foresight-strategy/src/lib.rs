//! # foresight-strategy
//!
//! Decides when to preload. Route changes and UI interaction events come in;
//! component and library loads go out through the cache crate.
//!
//! ## 4 Policies
//!
//! | Policy | Fires when |
//! |--------|-----------|
//! | Static pattern | `max(baseline, observed p(from → to))` exceeds the threshold, after the pattern delay |
//! | Route bundle | A route with a bundle is entered, after the bundle's priority delay |
//! | Session gate | The session is older than the gate; fires once |
//! | Idle time | The host reports idle capacity (or a short fallback timer elapses) |
//!
//! ## 2 Direct Triggers
//!
//! Hover/focus intent preloads immediately; a visibility trigger preloads on
//! first visibility and then disengages for good.
//!
//! Delayed preloads are owned by the route that scheduled them and are
//! cancelled when the route is left.

pub mod engine;
pub mod plan;
pub mod scheduled;
pub mod strategies;
pub mod triggers;

pub use engine::{EngineStats, StrategyEngine, StrategyEngineBuilder};
pub use plan::{Pattern, PreloadPlan, StrategyBundle};
pub use scheduled::ScheduledPreload;
pub use strategies::Policy;
pub use triggers::VisibilityTrigger;
