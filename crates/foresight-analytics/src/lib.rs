//! # foresight-analytics
//!
//! First-order Markov model of navigation. Every observed route change
//! increments a `from → to` counter; probabilities are the counter divided by
//! all transitions out of `from`.

pub mod navigation;
pub mod snapshot;

pub use navigation::{NavigationAnalytics, RankedRoute};
pub use snapshot::{AnalyticsSnapshot, TransitionRecord};
