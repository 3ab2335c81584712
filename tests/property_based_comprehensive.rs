//! Property-based tests for the boot-up audit pipeline
//!
//! Traces are generated as sequences of non-overlapping complete events with
//! random names, URLs and durations, then pushed through grouping,
//! extraction, aggregation and scoring.

use arranque::audit::{BootupTimeAudit, SCORE_THRESHOLD};
use arranque::bootup::{aggregate, extract_url_timings, is_attributable_url, Millis};
use arranque::taxonomy::{Taxonomy, URL_HEADING_KEY};
use arranque::trace::{
    BottomUpGrouper, EventStyleClassifier, GroupingEngine, Trace, TraceArtifacts, TraceEvent,
};
use proptest::prelude::*;
use serde_json::json;
use std::collections::HashSet;

const EVENT_NAMES: &[&str] = &[
    "EvaluateScript",
    "v8.compile",
    "FunctionCall",
    "MajorGC",
    "MinorGC",
    "ParseHTML",
    "Layout",
    "UpdateLayoutTree",
    "TimerFire",
];

const URLS: &[&str] = &[
    "https://a.test/app.js",
    "https://a.test/vendor.js",
    "https://cdn.test/lib.js",
    "about:blank",
    "",
];

/// (name index, url index, duration in microseconds)
fn event_strategy() -> impl Strategy<Value = (usize, usize, u64)> {
    (0..EVENT_NAMES.len(), 0..URLS.len(), 0u64..3_000_000)
}

fn build_trace(specs: &[(usize, usize, u64)]) -> Trace {
    let mut ts = 0.0;
    let events = specs
        .iter()
        .map(|&(name, url, dur)| {
            let mut event = TraceEvent::complete(EVENT_NAMES[name], ts, dur as f64);
            if !URLS[url].is_empty() {
                event = event.with_args(json!({"data": {"url": URLS[url]}}));
            }
            ts += dur as f64 + 10.0;
            event
        })
        .collect();
    Trace::new(events)
}

fn default_audit() -> BootupTimeAudit<BottomUpGrouper, EventStyleClassifier> {
    BootupTimeAudit::with_defaults(Taxonomy::default_taxonomy().unwrap())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_total_equals_sum_of_rows(specs in prop::collection::vec(event_strategy(), 0..40)) {
        let trace = build_trace(&specs);
        let tree = BottomUpGrouper.group(&trace).unwrap();
        let timings = extract_url_timings(&tree, &EventStyleClassifier::new());
        let aggregation = aggregate(&timings, &Taxonomy::default_taxonomy().unwrap()).unwrap();

        let row_sum: Millis = aggregation.urls.iter().map(|u| u.totals.total()).sum();
        prop_assert_eq!(aggregation.total, row_sum);
        prop_assert_eq!(aggregation.total, timings.total());

        for (entry, totals) in timings.iter().zip(&aggregation.urls) {
            prop_assert_eq!(&entry.url, &totals.url);
            prop_assert_eq!(entry.total(), totals.totals.total());
        }
    }

    #[test]
    fn prop_unattributable_urls_never_appear(specs in prop::collection::vec(event_strategy(), 0..40)) {
        let result = default_audit().audit_trace(&build_trace(&specs)).unwrap();

        for row in &result.details.items {
            prop_assert!(is_attributable_url(&row.url));
        }
        for entry in result.extended_info.value.iter() {
            prop_assert!(is_attributable_url(&entry.url));
        }
    }

    #[test]
    fn prop_headings_unique_with_url_first(specs in prop::collection::vec(event_strategy(), 0..40)) {
        let result = default_audit().audit_trace(&build_trace(&specs)).unwrap();
        let keys: Vec<&str> = result.details.headings.keys().collect();

        prop_assert_eq!(keys[0], URL_HEADING_KEY);
        let unique: HashSet<&str> = keys.iter().copied().collect();
        prop_assert_eq!(unique.len(), keys.len());

        for row in &result.details.items {
            prop_assert_eq!(row.cells.len(), keys.len() - 1);
            for ((key, _), heading) in row.cells.iter().zip(&keys[1..]) {
                prop_assert_eq!(key.as_str(), *heading);
            }
        }
    }

    #[test]
    fn prop_score_iff_under_threshold(specs in prop::collection::vec(event_strategy(), 0..40)) {
        let result = default_audit().audit_trace(&build_trace(&specs)).unwrap();
        prop_assert_eq!(result.score, result.raw_value < SCORE_THRESHOLD);
    }

    #[test]
    fn prop_audit_is_idempotent(specs in prop::collection::vec(event_strategy(), 0..40)) {
        let audit = default_audit();
        let artifacts = TraceArtifacts::from_default_pass(build_trace(&specs));

        let first = audit.audit(&artifacts).unwrap();
        let second = audit.audit(&artifacts).unwrap();
        prop_assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn prop_millis_sum_is_exact(values in prop::collection::vec(0.0f64..10_000.0, 0..50)) {
        let millis: Vec<Millis> = values.iter().map(|&v| Millis::from_ms(v)).collect();
        let total: Millis = millis.iter().sum();
        let tenths: u64 = millis.iter().map(|m| m.tenths()).sum();
        prop_assert_eq!(total.tenths(), tenths);
    }
}
