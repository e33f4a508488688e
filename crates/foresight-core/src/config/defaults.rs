// Single source of truth for all default values.

// --- Retry ---
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_BASE_DELAY_MS: u64 = 1_000;

// --- Strategy ---
pub const DEFAULT_PROBABILITY_THRESHOLD: f64 = 0.3;
pub const DEFAULT_PATTERN_DELAY_MS: u64 = 2_000;
pub const DEFAULT_SESSION_GATE_MS: u64 = 30_000;
pub const DEFAULT_IDLE_FALLBACK_MS: u64 = 100;
pub const DEFAULT_HIGH_PRIORITY_DELAY_MS: u64 = 500;
pub const DEFAULT_MEDIUM_PRIORITY_DELAY_MS: u64 = 2_000;
pub const DEFAULT_LOW_PRIORITY_DELAY_MS: u64 = 5_000;

// --- Metrics ---
pub const DEFAULT_METRICS_HISTORY_CAPACITY: usize = 1_024;

// --- Observability ---
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_JSON_LOGS: bool = false;
