/// Foresight system version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default number of candidates returned by next-route ranking.
pub const DEFAULT_NEXT_ROUTE_LIMIT: usize = 3;

/// Namespace label for component entries in logs and spans.
pub const COMPONENT_NAMESPACE: &str = "component";

/// Namespace label for shared-library entries in logs and spans.
pub const LIBRARY_NAMESPACE: &str = "library";
