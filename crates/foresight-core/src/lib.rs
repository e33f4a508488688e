//! # foresight-core
//!
//! Foundation crate for the Foresight preloading system.
//! Defines keys, routes, loaders, host signals, errors, config, and constants.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod key;
pub mod loader;
pub mod route;
pub mod signals;

// Re-export the most commonly used types at the crate root.
pub use config::ForesightConfig;
pub use errors::{ConfigError, ForesightError, ForesightResult, LoadError};
pub use key::ResourceKey;
pub use loader::{LoadFuture, Loader, LoaderRegistry};
pub use route::{Priority, Route};
pub use signals::{IdleNotifier, IdleSignal, NoIdleSupport};

#[doc(hidden)]
pub mod __private {
    pub use serde;
}
