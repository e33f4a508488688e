use foresight_analytics::NavigationAnalytics;
use proptest::prelude::*;

fn arb_route() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["/", "/reports", "/chat", "/settings", "/admin"])
        .prop_map(String::from)
}

fn arb_transitions() -> impl Strategy<Value = Vec<(String, String)>> {
    prop::collection::vec((arb_route(), arb_route()), 1..200)
}

proptest! {
    #[test]
    fn outgoing_probabilities_sum_to_one(transitions in arb_transitions()) {
        let analytics = NavigationAnalytics::new();
        for (from, to) in &transitions {
            analytics.record_transition(from.as_str(), to.as_str());
        }
        for (from, _) in &transitions {
            let total: f64 = ["/", "/reports", "/chat", "/settings", "/admin"]
                .iter()
                .map(|to| analytics.transition_probability(from, to))
                .sum();
            prop_assert!((total - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn counts_never_decrease(transitions in arb_transitions()) {
        let analytics = NavigationAnalytics::new();
        for (from, to) in &transitions {
            let before = analytics.transition_count(from, to);
            let visits_before = analytics.visit_count(to);
            analytics.record_transition(from.as_str(), to.as_str());
            prop_assert_eq!(analytics.transition_count(from, to), before + 1);
            prop_assert_eq!(analytics.visit_count(to), visits_before + 1);
        }
    }

    #[test]
    fn ranking_is_descending_by_count(transitions in arb_transitions(), limit in 0usize..6) {
        let analytics = NavigationAnalytics::new();
        for (from, to) in &transitions {
            analytics.record_transition(from.as_str(), to.as_str());
        }
        let ranked = analytics.ranked_next_routes("/", limit);
        prop_assert!(ranked.len() <= limit);
        for pair in ranked.windows(2) {
            prop_assert!(pair[0].count >= pair[1].count);
        }
    }
}
