use std::time::Duration;

use foresight_core::config::{BackoffKind, RetryConfig};
use foresight_core::{ConfigError, ForesightConfig};

// ── Defaults ──────────────────────────────────────────────────────────────

#[test]
fn defaults_match_documented_values() {
    let config = ForesightConfig::default();
    assert_eq!(config.retry.max_attempts, 3);
    assert_eq!(config.retry.base_delay_ms, 1_000);
    assert_eq!(config.retry.backoff, BackoffKind::Linear);
    assert_eq!(config.strategy.probability_threshold, 0.3);
    assert_eq!(config.strategy.default_pattern_delay_ms, 2_000);
    assert_eq!(config.strategy.session_gate_ms, 30_000);
    assert_eq!(config.strategy.idle_fallback_ms, 100);
    assert_eq!(config.metrics.history_capacity, 1_024);
    assert_eq!(config.observability.log_level, "info");
    assert!(config.validate().is_ok());
}

// ── TOML loading ──────────────────────────────────────────────────────────

#[test]
fn partial_toml_keeps_other_defaults() {
    let config = ForesightConfig::from_toml_str(
        r#"
        [retry]
        max_attempts = 5
        backoff = "exponential"

        [strategy.priority_delays]
        high_ms = 250
        "#,
    )
    .unwrap();

    assert_eq!(config.retry.max_attempts, 5);
    assert_eq!(config.retry.base_delay_ms, 1_000);
    assert_eq!(config.retry.backoff, BackoffKind::Exponential);
    assert_eq!(config.strategy.priority_delays.high_ms, 250);
    assert_eq!(config.strategy.priority_delays.low_ms, 5_000);
}

#[test]
fn empty_document_is_the_default_config() {
    let config = ForesightConfig::from_toml_str("").unwrap();
    assert_eq!(config.retry.max_attempts, 3);
}

#[test]
fn malformed_toml_is_a_parse_error() {
    let err = ForesightConfig::from_toml_str("[retry\nmax_attempts = ").unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
}

#[test]
fn out_of_range_threshold_is_rejected() {
    let err = ForesightConfig::from_toml_str(
        r#"
        [strategy]
        probability_threshold = 1.5
        "#,
    )
    .unwrap_err();
    assert!(matches!(err, ConfigError::InvalidProbability { value, .. } if value == 1.5));
}

#[test]
fn zero_attempts_is_rejected() {
    let err = ForesightConfig::from_toml_str("[retry]\nmax_attempts = 0").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidValue { .. }));
}

#[test]
fn config_survives_toml_round_trip() {
    let mut config = ForesightConfig::default();
    config.strategy.session_gate_ms = 12_000;
    let text = config.to_toml_string().unwrap();
    let parsed = ForesightConfig::from_toml_str(&text).unwrap();
    assert_eq!(parsed.strategy.session_gate_ms, 12_000);
}

// ── Backoff schedule ──────────────────────────────────────────────────────

#[test]
fn linear_backoff_grows_by_base_per_retry() {
    let retry = RetryConfig::default();
    assert_eq!(retry.backoff_delay(1), Duration::from_millis(1_000));
    assert_eq!(retry.backoff_delay(2), Duration::from_millis(2_000));
    assert_eq!(retry.backoff_delay(3), Duration::from_millis(3_000));
}

#[test]
fn exponential_backoff_doubles_per_retry() {
    let retry = RetryConfig {
        backoff: BackoffKind::Exponential,
        ..RetryConfig::default()
    };
    assert_eq!(retry.backoff_delay(1), Duration::from_millis(1_000));
    assert_eq!(retry.backoff_delay(2), Duration::from_millis(2_000));
    assert_eq!(retry.backoff_delay(3), Duration::from_millis(4_000));
}
