//! Bottom-up grouping tree and the two collaborator seams of the audit
//!
//! The aggregation core never inspects raw events. It sees a [`GroupTree`]
//! produced by a [`GroupingEngine`] and asks an [`EventClassifier`] for a
//! display label per task node.

use crate::trace::artifacts::Trace;
use crate::trace::event::TraceEvent;
use serde::Serialize;
use thiserror::Error;

/// Self time as reported by a grouping engine
///
/// Engines disagree on units; [`SelfTime::as_millis`] normalizes before any
/// rounding happens.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum SelfTime {
    Millis(f64),
    Seconds(f64),
}

impl SelfTime {
    pub fn as_millis(self) -> f64 {
        match self {
            SelfTime::Millis(ms) => ms,
            SelfTime::Seconds(s) => s * 1000.0,
        }
    }
}

/// Leaf of the tree: one task type run on behalf of a URL
#[derive(Debug, Clone, PartialEq)]
pub struct TaskNode {
    pub self_time: SelfTime,
    /// Representative event, handed to the classifier
    pub event: TraceEvent,
}

/// All tasks attributed to one URL, in the engine's native order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UrlNode {
    pub url: String,
    pub children: Vec<TaskNode>,
}

impl UrlNode {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            children: Vec::new(),
        }
    }

    pub fn with_task(mut self, self_time: SelfTime, event: TraceEvent) -> Self {
        self.children.push(TaskNode { self_time, event });
        self
    }
}

/// Trace regrouped bottom-up: URL first, then task
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GroupTree {
    pub children: Vec<UrlNode>,
}

impl GroupTree {
    pub fn new(children: Vec<UrlNode>) -> Self {
        Self { children }
    }
}

/// Display style of an event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventStyle {
    pub title: String,
}

impl EventStyle {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }
}

/// Failures turning a trace into a [`GroupTree`]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GroupingError {
    #[error("End event '{name}' at {ts}us on thread {pid}:{tid} has no matching begin")]
    UnmatchedEnd {
        name: String,
        ts: f64,
        pid: u64,
        tid: u64,
    },

    #[error("Begin event '{name}' at {ts}us on thread {pid}:{tid} never ends")]
    UnclosedBegin {
        name: String,
        ts: f64,
        pid: u64,
        tid: u64,
    },

    #[error("Complete event '{name}' at {ts}us has no duration")]
    MissingDuration { name: String, ts: f64 },

    #[error("Event '{name}' at {ts}us has invalid timing (duration {dur}us)")]
    InvalidTiming { name: String, ts: f64, dur: f64 },

    #[error("Malformed grouping tree: {0}")]
    Malformed(String),
}

/// Turns a flat trace into a per-URL, per-task tree
pub trait GroupingEngine {
    fn group(&self, trace: &Trace) -> Result<GroupTree, GroupingError>;
}

impl<F> GroupingEngine for F
where
    F: Fn(&Trace) -> Result<GroupTree, GroupingError>,
{
    fn group(&self, trace: &Trace) -> Result<GroupTree, GroupingError> {
        self(trace)
    }
}

/// Maps an event to its display style
pub trait EventClassifier {
    fn classify(&self, event: &TraceEvent) -> EventStyle;
}

impl<F> EventClassifier for F
where
    F: Fn(&TraceEvent) -> EventStyle,
{
    fn classify(&self, event: &TraceEvent) -> EventStyle {
        self(event)
    }
}
