//! Default grouping engine: bottom-up by URL, then by event name
//!
//! 1. Pair begin/end events per thread and collect complete events as spans
//! 2. Nest spans per thread by time containment; a span's self time is its
//!    duration minus the time covered by its direct children
//! 3. Attribute each span to its own URL, else its nearest attributed ancestor
//! 4. Group by URL, then by event name, in order of first start time

use crate::trace::artifacts::Trace;
use crate::trace::event::{Phase, TraceEvent};
use crate::trace::tree::{GroupTree, GroupingEngine, GroupingError, SelfTime, TaskNode, UrlNode};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

/// Builds a [`GroupTree`] from complete (`X`) and begin/end (`B`/`E`) events
///
/// Instant, metadata and async events carry no self time and are ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct BottomUpGrouper;

impl BottomUpGrouper {
    pub fn new() -> Self {
        Self
    }
}

#[derive(Debug)]
struct Span<'a> {
    event: &'a TraceEvent,
    /// Index of the (begin) event in the trace
    index: usize,
    start: f64,
    end: f64,
    self_time_us: f64,
    url: String,
}

impl<'a> Span<'a> {
    fn new(event: &'a TraceEvent, index: usize, start: f64, end: f64) -> Self {
        Self {
            event,
            index,
            start,
            end,
            self_time_us: end - start,
            url: event.own_url().unwrap_or_default().to_string(),
        }
    }

    fn thread(&self) -> (u64, u64) {
        (self.event.pid, self.event.tid)
    }
}

impl GroupingEngine for BottomUpGrouper {
    fn group(&self, trace: &Trace) -> Result<GroupTree, GroupingError> {
        let mut spans = collect_spans(&trace.trace_events)?;
        nest_spans(&mut spans);
        let tree = build_tree(&spans);

        tracing::debug!(
            events = trace.trace_events.len(),
            spans = spans.len(),
            urls = tree.children.len(),
            "grouped trace bottom-up"
        );

        Ok(tree)
    }
}

fn check_timing(event: &TraceEvent, dur: f64) -> Result<(), GroupingError> {
    if !event.ts.is_finite() || !dur.is_finite() || dur < 0.0 {
        return Err(GroupingError::InvalidTiming {
            name: event.name.clone(),
            ts: event.ts,
            dur,
        });
    }
    Ok(())
}

fn collect_spans(events: &[TraceEvent]) -> Result<Vec<Span<'_>>, GroupingError> {
    let mut spans = Vec::new();
    let mut open: HashMap<(u64, u64), Vec<(usize, &TraceEvent)>> = HashMap::new();

    for (index, event) in events.iter().enumerate() {
        match event.ph {
            Phase::Complete => {
                let dur = event.dur.ok_or_else(|| GroupingError::MissingDuration {
                    name: event.name.clone(),
                    ts: event.ts,
                })?;
                check_timing(event, dur)?;
                spans.push(Span::new(event, index, event.ts, event.ts + dur));
            }
            Phase::Begin => {
                open.entry((event.pid, event.tid))
                    .or_default()
                    .push((index, event));
            }
            Phase::End => {
                // An unnamed end closes whatever begin is innermost
                let (begin_index, begin) = open
                    .get_mut(&(event.pid, event.tid))
                    .filter(|stack| {
                        stack.last().is_some_and(|(_, begin)| {
                            event.name.is_empty() || begin.name == event.name
                        })
                    })
                    .and_then(Vec::pop)
                    .ok_or_else(|| GroupingError::UnmatchedEnd {
                        name: event.name.clone(),
                        ts: event.ts,
                        pid: event.pid,
                        tid: event.tid,
                    })?;
                check_timing(begin, event.ts - begin.ts)?;
                spans.push(Span::new(begin, begin_index, begin.ts, event.ts));
            }
            Phase::Instant | Phase::Other => {}
        }
    }

    if let Some((_, begin)) = open.into_values().flatten().min_by_key(|(index, _)| *index) {
        return Err(GroupingError::UnclosedBegin {
            name: begin.name.clone(),
            ts: begin.ts,
            pid: begin.pid,
            tid: begin.tid,
        });
    }

    Ok(spans)
}

/// Parents sort before children: earlier start first, longer span first on ties
fn nesting_order(a: &Span<'_>, b: &Span<'_>) -> Ordering {
    a.start
        .total_cmp(&b.start)
        .then(b.end.total_cmp(&a.end))
        .then(a.index.cmp(&b.index))
}

fn nest_spans(spans: &mut [Span<'_>]) {
    let mut threads: BTreeMap<(u64, u64), Vec<usize>> = BTreeMap::new();
    for (i, span) in spans.iter().enumerate() {
        threads.entry(span.thread()).or_default().push(i);
    }

    for mut members in threads.into_values() {
        members.sort_by(|&a, &b| nesting_order(&spans[a], &spans[b]));

        let mut stack: Vec<usize> = Vec::new();
        for child in members {
            while let Some(&top) = stack.last() {
                if spans[top].end <= spans[child].start {
                    stack.pop();
                } else {
                    break;
                }
            }

            if let Some(&parent) = stack.last() {
                // Children overhanging their parent only cover the overlap
                let covered = spans[child].end.min(spans[parent].end) - spans[child].start;
                spans[parent].self_time_us -= covered;

                if spans[child].url.is_empty() {
                    spans[child].url = spans[parent].url.clone();
                }
            }

            stack.push(child);
        }
    }

    for span in spans.iter_mut() {
        span.self_time_us = span.self_time_us.max(0.0);
    }
}

fn build_tree(spans: &[Span<'_>]) -> GroupTree {
    let mut order: Vec<usize> = (0..spans.len()).collect();
    order.sort_by(|&a, &b| {
        spans[a]
            .start
            .total_cmp(&spans[b].start)
            .then(spans[a].index.cmp(&spans[b].index))
    });

    // (url, [(event name, representative event, self time us)])
    let mut groups: Vec<(&str, Vec<(&str, &TraceEvent, f64)>)> = Vec::new();
    let mut url_index: HashMap<&str, usize> = HashMap::new();

    for i in order {
        let span = &spans[i];
        let slot = *url_index.entry(span.url.as_str()).or_insert_with(|| {
            groups.push((span.url.as_str(), Vec::new()));
            groups.len() - 1
        });

        let tasks = &mut groups[slot].1;
        match tasks
            .iter_mut()
            .find(|(name, _, _)| *name == span.event.name)
        {
            Some(task) => task.2 += span.self_time_us,
            None => tasks.push((span.event.name.as_str(), span.event, span.self_time_us)),
        }
    }

    let children = groups
        .into_iter()
        .map(|(url, tasks)| UrlNode {
            url: url.to_string(),
            children: tasks
                .into_iter()
                .map(|(_, event, self_time_us)| TaskNode {
                    self_time: SelfTime::Millis(self_time_us / 1000.0),
                    event: event.clone(),
                })
                .collect(),
        })
        .collect();

    GroupTree::new(children)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn script(name: &str, ts: f64, dur: f64, url: &str) -> TraceEvent {
        TraceEvent::complete(name, ts, dur).with_args(json!({"data": {"url": url}}))
    }

    fn millis(node: &TaskNode) -> f64 {
        node.self_time.as_millis()
    }

    #[test]
    fn test_empty_trace() {
        let tree = BottomUpGrouper::new().group(&Trace::default()).unwrap();
        assert!(tree.children.is_empty());
    }

    #[test]
    fn test_self_time_excludes_children() {
        // EvaluateScript 0..10ms containing a 3ms MinorGC
        let trace = Trace::new(vec![
            script("EvaluateScript", 0.0, 10_000.0, "https://a.test/app.js"),
            TraceEvent::complete("MinorGC", 2_000.0, 3_000.0),
        ]);

        let tree = BottomUpGrouper::new().group(&trace).unwrap();
        assert_eq!(tree.children.len(), 1);

        let node = &tree.children[0];
        assert_eq!(node.url, "https://a.test/app.js");
        assert_eq!(node.children.len(), 2);
        assert_eq!(node.children[0].event.name, "EvaluateScript");
        assert_eq!(millis(&node.children[0]), 7.0);
        assert_eq!(node.children[1].event.name, "MinorGC");
        assert_eq!(millis(&node.children[1]), 3.0);
    }

    #[test]
    fn test_same_name_tasks_are_summed() {
        let trace = Trace::new(vec![
            script("FunctionCall", 0.0, 1_000.0, "https://a.test/app.js"),
            script("FunctionCall", 5_000.0, 2_500.0, "https://a.test/app.js"),
        ]);

        let tree = BottomUpGrouper::new().group(&trace).unwrap();
        let node = &tree.children[0];
        assert_eq!(node.children.len(), 1);
        assert_eq!(millis(&node.children[0]), 3.5);
    }

    #[test]
    fn test_unattributed_events_group_under_empty_url() {
        let trace = Trace::new(vec![
            TraceEvent::complete("Layout", 0.0, 1_000.0),
            script("EvaluateScript", 2_000.0, 1_000.0, "https://a.test/app.js"),
        ]);

        let tree = BottomUpGrouper::new().group(&trace).unwrap();
        let urls: Vec<&str> = tree.children.iter().map(|n| n.url.as_str()).collect();
        assert_eq!(urls, vec!["", "https://a.test/app.js"]);
    }

    #[test]
    fn test_begin_end_pairs() {
        let mut begin = script("ParseHTML", 0.0, 0.0, "https://a.test/");
        begin.ph = Phase::Begin;
        begin.dur = None;
        let mut end = TraceEvent::complete("ParseHTML", 4_000.0, 0.0);
        end.ph = Phase::End;
        end.dur = None;

        let tree = BottomUpGrouper::new()
            .group(&Trace::new(vec![begin, end]))
            .unwrap();
        assert_eq!(tree.children[0].url, "https://a.test/");
        assert_eq!(millis(&tree.children[0].children[0]), 4.0);
    }

    #[test]
    fn test_threads_nest_independently() {
        let trace = Trace::new(vec![
            script("EvaluateScript", 0.0, 10_000.0, "https://a.test/app.js").with_thread(1, 1),
            // Overlaps in time but runs on a worker thread
            script("EvaluateScript", 1_000.0, 2_000.0, "https://a.test/worker.js")
                .with_thread(1, 2),
        ]);

        let tree = BottomUpGrouper::new().group(&trace).unwrap();
        assert_eq!(millis(&tree.children[0].children[0]), 10.0);
        assert_eq!(millis(&tree.children[1].children[0]), 2.0);
    }

    #[test]
    fn test_overhanging_child_clipped() {
        let trace = Trace::new(vec![
            script("EvaluateScript", 0.0, 4_000.0, "https://a.test/app.js"),
            TraceEvent::complete("MinorGC", 3_000.0, 2_000.0),
        ]);

        let tree = BottomUpGrouper::new().group(&trace).unwrap();
        let node = &tree.children[0];
        assert_eq!(millis(&node.children[0]), 3.0);
        assert_eq!(millis(&node.children[1]), 2.0);
    }

    #[test]
    fn test_unmatched_end_is_error() {
        let mut end = TraceEvent::complete("Layout", 0.0, 0.0);
        end.ph = Phase::End;

        let result = BottomUpGrouper::new().group(&Trace::new(vec![end]));
        assert!(matches!(result, Err(GroupingError::UnmatchedEnd { .. })));
    }

    fn phase(name: &str, ph: Phase, ts: f64) -> TraceEvent {
        let mut event = TraceEvent::complete(name, ts, 0.0);
        event.ph = ph;
        event.dur = None;
        event
    }

    #[test]
    fn test_mismatched_end_name_is_error() {
        let trace = Trace::new(vec![
            phase("Layout", Phase::Begin, 0.0),
            phase("ParseHTML", Phase::End, 1_000.0),
        ]);

        let result = BottomUpGrouper::new().group(&trace);
        assert_eq!(
            result.unwrap_err(),
            GroupingError::UnmatchedEnd {
                name: "ParseHTML".to_string(),
                ts: 1_000.0,
                pid: 0,
                tid: 0,
            }
        );
    }

    #[test]
    fn test_unnamed_end_closes_innermost_begin() {
        let trace = Trace::new(vec![
            phase("Layout", Phase::Begin, 0.0),
            phase("", Phase::End, 2_000.0),
        ]);

        let tree = BottomUpGrouper::new().group(&trace).unwrap();
        assert_eq!(tree.children[0].children[0].event.name, "Layout");
        assert_eq!(millis(&tree.children[0].children[0]), 2.0);
    }

    #[test]
    fn test_unclosed_begin_is_error() {
        let mut begin = TraceEvent::complete("Layout", 0.0, 0.0);
        begin.ph = Phase::Begin;

        let result = BottomUpGrouper::new().group(&Trace::new(vec![begin]));
        assert!(matches!(result, Err(GroupingError::UnclosedBegin { .. })));
    }

    #[test]
    fn test_missing_duration_is_error() {
        let mut event = TraceEvent::complete("Layout", 0.0, 0.0);
        event.dur = None;

        let result = BottomUpGrouper::new().group(&Trace::new(vec![event]));
        assert!(matches!(result, Err(GroupingError::MissingDuration { .. })));
    }

    #[test]
    fn test_negative_duration_is_error() {
        let event = TraceEvent::complete("Layout", 0.0, -5.0);
        let result = BottomUpGrouper::new().group(&Trace::new(vec![event]));
        assert!(matches!(result, Err(GroupingError::InvalidTiming { .. })));
    }
}
