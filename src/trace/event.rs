//! Trace event model (Chrome trace event format subset)

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Event phase (`ph` field)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Complete event carrying its own duration
    #[serde(rename = "X")]
    Complete,
    #[serde(rename = "B")]
    Begin,
    #[serde(rename = "E")]
    End,
    #[serde(rename = "I", alias = "i")]
    Instant,
    /// Metadata, counters, flows, async events and anything else
    #[serde(other)]
    Other,
}

/// A single timed event from a browser performance trace
///
/// Timestamps and durations are in microseconds, as recorded by the browser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceEvent {
    pub name: String,
    #[serde(default)]
    pub cat: String,
    pub ph: Phase,
    #[serde(default)]
    pub ts: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dur: Option<f64>,
    #[serde(default)]
    pub pid: u64,
    #[serde(default)]
    pub tid: u64,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub args: Value,
}

impl TraceEvent {
    /// Create a complete (`X`) event with no arguments
    pub fn complete(name: impl Into<String>, ts: f64, dur: f64) -> Self {
        Self {
            name: name.into(),
            cat: String::new(),
            ph: Phase::Complete,
            ts,
            dur: Some(dur),
            pid: 0,
            tid: 0,
            args: Value::Null,
        }
    }

    pub fn with_thread(mut self, pid: u64, tid: u64) -> Self {
        self.pid = pid;
        self.tid = tid;
        self
    }

    pub fn with_args(mut self, args: Value) -> Self {
        self.args = args;
        self
    }

    /// URL of the script or document this event runs on behalf of, if the
    /// event records one itself
    ///
    /// Checks, in order: `args.data.url`, `args.data.scriptName`,
    /// `args.data.stackTrace[0].url`, `args.beginData.url`,
    /// `args.beginData.stackTrace[0].url`.
    pub fn own_url(&self) -> Option<&str> {
        let data = &self.args["data"];
        let begin_data = &self.args["beginData"];
        let candidates = [
            &data["url"],
            &data["scriptName"],
            &data["stackTrace"][0]["url"],
            &begin_data["url"],
            &begin_data["stackTrace"][0]["url"],
        ];

        candidates
            .into_iter()
            .filter_map(Value::as_str)
            .find(|url| !url.is_empty())
    }
}
