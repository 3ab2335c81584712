// End-to-end tests for the boot-up pipeline: tree → timings → aggregation → result

use super::*;
use crate::taxonomy::Taxonomy;
use crate::trace::{EventStyle, GroupTree, SelfTime, TraceEvent, UrlNode};

const THRESHOLD: Millis = Millis::from_whole_ms(4000);

/// Test trees use the display title as the event name
fn by_name(event: &TraceEvent) -> EventStyle {
    EventStyle::new(event.name.clone())
}

fn task(title: &str) -> TraceEvent {
    TraceEvent::complete(title, 0.0, 0.0)
}

fn run(tree: &GroupTree) -> AuditResult {
    let taxonomy = Taxonomy::default_taxonomy().unwrap();
    let timings = extract_url_timings(tree, &by_name);
    let aggregation = aggregate(&timings, &taxonomy).unwrap();
    build_audit_result(aggregation, timings, THRESHOLD)
}

/// Strip separators and unit from a formatted cell
fn unformat(cell: &str) -> Millis {
    let number: String = cell
        .trim_end_matches("ms")
        .trim_end_matches('\u{a0}')
        .chars()
        .filter(|c| *c != ',')
        .collect();
    Millis::from_ms(number.parse().unwrap())
}

#[test]
fn test_single_script_scenario() {
    let tree = GroupTree::new(vec![UrlNode::new("https://a.test/script.js")
        .with_task(SelfTime::Millis(1500.4), task("Evaluate Script"))
        .with_task(SelfTime::Millis(200.1), task("Parse Script"))]);

    let taxonomy = Taxonomy::default_taxonomy().unwrap();
    let timings = extract_url_timings(&tree, &by_name);

    let script = timings.get("https://a.test/script.js").unwrap();
    assert_eq!(script.get("Evaluate Script").unwrap().as_ms(), 1500.4);
    assert_eq!(script.get("Parse Script").unwrap().as_ms(), 200.1);

    let aggregation = aggregate(&timings, &taxonomy).unwrap();
    let totals = &aggregation.urls[0].totals;
    assert_eq!(totals.get("scripting").as_ms(), 1500.4);
    assert_eq!(totals.get("scriptParseCompile").as_ms(), 200.1);
    assert_eq!(totals.len(), 2);

    let result = build_audit_result(aggregation, timings, THRESHOLD);
    assert_eq!(result.raw_value.as_ms(), 1700.5);
    assert!(result.score);
    assert_eq!(result.display_value, "1,700\u{a0}ms");

    let row = &result.details.items[0];
    assert_eq!(row.url, "https://a.test/script.js");
    assert_eq!(row.cell("scripting"), Some("1,500.4\u{a0}ms"));
    assert_eq!(row.cell("scriptParseCompile"), Some("200.1\u{a0}ms"));
}

#[test]
fn test_only_about_blank_scenario() {
    let tree = GroupTree::new(vec![
        UrlNode::new("about:blank").with_task(SelfTime::Millis(900.0), task("Evaluate Script"))
    ]);

    let result = run(&tree);
    assert!(result.details.items.is_empty());
    assert_eq!(result.raw_value, Millis::ZERO);
    assert!(result.score);
    assert!(result.extended_info.value.is_empty());
}

#[test]
fn test_two_urls_over_threshold_scenario() {
    let tree = GroupTree::new(vec![
        UrlNode::new("https://a.test/a.js")
            .with_task(SelfTime::Millis(2500.0), task("Evaluate Script")),
        UrlNode::new("https://a.test/b.js")
            .with_task(SelfTime::Millis(2000.0), task("Function Call")),
    ]);

    let result = run(&tree);
    assert_eq!(result.raw_value.as_ms(), 4500.0);
    assert!(!result.score);
    assert_eq!(result.details.items.len(), 2);
}

#[test]
fn test_exact_threshold_fails() {
    let tree = GroupTree::new(vec![UrlNode::new("https://a.test/a.js")
        .with_task(SelfTime::Millis(4000.0), task("Evaluate Script"))]);

    let result = run(&tree);
    assert_eq!(result.raw_value.as_ms(), 4000.0);
    assert!(!result.score);
}

#[test]
fn test_row_cells_sum_to_url_total() {
    let tree = GroupTree::new(vec![
        UrlNode::new("https://a.test/a.js")
            .with_task(SelfTime::Millis(12.34), task("Evaluate Script"))
            .with_task(SelfTime::Millis(0.06), task("Minor GC"))
            .with_task(SelfTime::Millis(3.33), task("Layout")),
        UrlNode::new("https://a.test/b.js")
            .with_task(SelfTime::Millis(1234.56), task("Paint"))
            .with_task(SelfTime::Millis(7.77), task("Compile Script")),
    ]);

    let result = run(&tree);
    for row in &result.details.items {
        let cell_sum: Millis = row.cells.iter().map(|(_, cell)| unformat(cell)).sum();
        let url_total = result.extended_info.value.get(&row.url).unwrap().total();
        assert_eq!(cell_sum, url_total, "row {}", row.url);
    }
    assert_eq!(result.raw_value, result.extended_info.value.total());
}

#[test]
fn test_headings_follow_discovery_order() {
    let tree = GroupTree::new(vec![
        UrlNode::new("https://a.test/a.js")
            .with_task(SelfTime::Millis(1.0), task("Layout"))
            .with_task(SelfTime::Millis(1.0), task("Evaluate Script")),
        UrlNode::new("https://a.test/b.js")
            .with_task(SelfTime::Millis(1.0), task("Function Call"))
            .with_task(SelfTime::Millis(1.0), task("Minor GC")),
    ]);

    let result = run(&tree);
    let keys: Vec<&str> = result.details.headings.keys().collect();
    assert_eq!(keys, vec!["url", "styleLayout", "scripting", "scriptGC"]);

    // a.js had no GC time
    let a = &result.details.items[0];
    assert_eq!(a.cell("scriptGC"), Some("0.0\u{a0}ms"));
}

#[test]
fn test_output_contract_shape() {
    let tree = GroupTree::new(vec![UrlNode::new("https://a.test/script.js")
        .with_task(SelfTime::Millis(1500.4), task("Evaluate Script"))
        .with_task(SelfTime::Millis(200.1), task("Parse Script"))]);

    let json = serde_json::to_value(run(&tree)).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "score": true,
            "rawValue": 1700.5,
            "displayValue": "1,700\u{a0}ms",
            "details": {
                "headings": [
                    {"key": "url", "itemType": "url", "text": "URL"},
                    {"key": "scripting", "itemType": "text", "text": "Script Evaluation"},
                    {"key": "scriptParseCompile", "itemType": "text", "text": "Script Parsing & Compile"}
                ],
                "items": [{
                    "url": "https://a.test/script.js",
                    "scripting": "1,500.4\u{a0}ms",
                    "scriptParseCompile": "200.1\u{a0}ms"
                }]
            },
            "extendedInfo": {
                "value": {
                    "https://a.test/script.js": {"Evaluate Script": 1500.4, "Parse Script": 200.1}
                }
            }
        })
    );
}

#[test]
fn test_pipeline_is_idempotent() {
    let tree = GroupTree::new(vec![
        UrlNode::new("https://a.test/a.js")
            .with_task(SelfTime::Millis(10.0), task("Evaluate Script")),
        UrlNode::new("https://a.test/b.js").with_task(SelfTime::Millis(20.0), task("Layout")),
    ]);

    let first = serde_json::to_string(&run(&tree)).unwrap();
    let second = serde_json::to_string(&run(&tree)).unwrap();
    assert_eq!(first, second);
}
