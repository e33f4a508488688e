mod common;

use common::{Component, Library};
use foresight_core::{ConfigError, Priority};
use foresight_strategy::{Pattern, PreloadPlan, StrategyBundle};

type Plan = PreloadPlan<Component, Library>;

const PLAN: &str = r#"
frequent_resources = ["dashboard"]
heavy_libraries = ["pdf"]

[route_resources]
"/reports" = "reports"
"/chat" = "chat"

[[patterns]]
from = "/"
to = "/reports"
baseline_probability = 0.6
delay_ms = 1500

[[patterns]]
from = "/"
to = "/chat"
baseline_probability = 0.2

[[bundles]]
route = "/reports"
resource_keys = ["chat"]
library_keys = ["charts"]
priority = "high"
"#;

// ── Parsing ───────────────────────────────────────────────────────────────

#[test]
fn parses_full_plan() {
    let plan = Plan::from_toml_str(PLAN).unwrap();

    assert_eq!(plan.patterns.len(), 2);
    assert_eq!(plan.patterns[0].delay_ms, Some(1500));
    assert_eq!(plan.patterns[1].delay_ms, None);
    assert_eq!(plan.resource_for_route("/chat"), Some(Component::Chat));
    assert_eq!(plan.frequent_resources, vec![Component::Dashboard]);
    assert_eq!(plan.heavy_libraries, vec![Library::Pdf]);

    let bundle = plan.bundle_for("/reports").unwrap();
    assert_eq!(bundle.priority, Priority::High);
    assert_eq!(bundle.library_keys, vec![Library::Charts]);
    assert!(plan.bundle_for("/").is_none());
}

#[test]
fn empty_document_is_empty_plan() {
    let plan = Plan::from_toml_str("").unwrap();
    assert!(plan.patterns.is_empty());
    assert!(plan.bundles.is_empty());
    assert!(plan.referenced_resources().is_empty());
}

#[test]
fn unknown_key_is_parse_error() {
    let err = Plan::from_toml_str(r#"frequent_resources = ["maps"]"#).unwrap_err();
    match err {
        ConfigError::Parse { reason } => assert!(reason.contains("maps"), "{reason}"),
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[test]
fn unknown_priority_is_parse_error() {
    let doc = r#"
[[bundles]]
route = "/reports"
priority = "urgent"
"#;
    assert!(matches!(
        Plan::from_toml_str(doc),
        Err(ConfigError::Parse { .. })
    ));
}

// ── Validation ────────────────────────────────────────────────────────────

#[test]
fn pattern_target_must_map_to_component() {
    let plan = Plan::new().with_pattern(Pattern::new("/", "/nowhere", 0.5));
    match plan.validate() {
        Err(ConfigError::UnmappedRoute { from, to }) => {
            assert_eq!(from, "/");
            assert_eq!(to, "/nowhere");
        }
        other => panic!("expected unmapped route, got {other:?}"),
    }
}

#[test]
fn baseline_must_be_a_probability() {
    let plan = Plan::new()
        .with_route("/reports", Component::Reports)
        .with_pattern(Pattern::new("/", "/reports", -0.1));
    assert!(matches!(
        plan.validate(),
        Err(ConfigError::InvalidProbability { .. })
    ));
}

#[test]
fn one_bundle_per_route() {
    let plan = Plan::new()
        .with_bundle(StrategyBundle::new("/reports", Priority::High))
        .with_bundle(StrategyBundle::new("/reports", Priority::Low));
    assert!(matches!(
        plan.validate(),
        Err(ConfigError::InvalidValue { .. })
    ));
}

// ── Queries ───────────────────────────────────────────────────────────────

#[test]
fn referenced_keys_are_sorted_and_deduplicated() {
    let plan = Plan::from_toml_str(PLAN).unwrap();
    assert_eq!(
        plan.referenced_resources(),
        vec![Component::Dashboard, Component::Reports, Component::Chat]
    );
    assert_eq!(plan.referenced_libraries(), vec![Library::Charts, Library::Pdf]);
}

#[test]
fn patterns_from_filters_by_origin() {
    let plan = Plan::from_toml_str(PLAN).unwrap();
    assert_eq!(plan.patterns_from("/").count(), 2);
    assert_eq!(plan.patterns_from("/reports").count(), 0);
}
