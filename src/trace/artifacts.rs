//! Trace artifacts: a named collection of traces loaded from JSON

use crate::trace::event::TraceEvent;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Name of the trace the boot-up audit reads
pub const DEFAULT_PASS: &str = "defaultPass";

/// One recorded trace: a flat, chronologically-ordered event list
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    #[serde(rename = "traceEvents", default)]
    pub trace_events: Vec<TraceEvent>,
}

impl Trace {
    pub fn new(trace_events: Vec<TraceEvent>) -> Self {
        Self { trace_events }
    }

    pub fn is_empty(&self) -> bool {
        self.trace_events.is_empty()
    }
}

/// Traces keyed by pass name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TraceArtifacts {
    pub traces: BTreeMap<String, Trace>,
}

impl TraceArtifacts {
    /// Wrap a single trace as the default pass
    pub fn from_default_pass(trace: Trace) -> Self {
        let mut traces = BTreeMap::new();
        traces.insert(DEFAULT_PASS.to_string(), trace);
        Self { traces }
    }

    /// Load artifacts from a JSON file
    ///
    /// Accepts `{"traces": {"<pass>": {"traceEvents": [...]}}}`, a bare Chrome
    /// trace object `{"traceEvents": [...]}`, or a top-level event array.
    /// The latter two become the default pass.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).with_context(|| {
            format!("Failed to read trace file: {}", path.as_ref().display())
        })?;

        Self::from_json_str(&content)
            .with_context(|| format!("Invalid trace file: {}", path.as_ref().display()))
    }

    /// Parse artifacts, choosing the shape from the top-level JSON value
    ///
    /// An object with `traces` is an artifacts object, an object with
    /// `traceEvents` is a single trace, and an array is a bare event list.
    /// Anything else is rejected.
    pub fn from_json_str(content: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(content).context("Failed to parse trace JSON")?;

        let has_key = |key: &str| value.as_object().is_some_and(|map| map.contains_key(key));
        let (is_artifacts, is_trace) = (has_key("traces"), has_key("traceEvents"));

        if is_artifacts {
            serde_json::from_value(value).context("Invalid trace artifacts")
        } else if is_trace {
            let trace: Trace = serde_json::from_value(value).context("Invalid trace")?;
            Ok(Self::from_default_pass(trace))
        } else if value.is_array() {
            let events: Vec<TraceEvent> =
                serde_json::from_value(value).context("Invalid trace event array")?;
            Ok(Self::from_default_pass(Trace::new(events)))
        } else {
            bail!(
                "Unrecognized trace JSON: expected an object with 'traces' or \
                 'traceEvents', or an event array"
            )
        }
    }

    pub fn trace(&self, pass: &str) -> Option<&Trace> {
        self.traces.get(pass)
    }

    pub fn default_pass(&self) -> Option<&Trace> {
        self.trace(DEFAULT_PASS)
    }
}
