//! Boot-up time audit: wires grouping, classification, and aggregation
//!
//! ```
//! use arranque::audit::BootupTimeAudit;
//! use arranque::taxonomy::Taxonomy;
//! use arranque::trace::{Trace, TraceArtifacts, TraceEvent};
//! use serde_json::json;
//!
//! let trace = Trace::new(vec![TraceEvent::complete("EvaluateScript", 0.0, 1_500_400.0)
//!     .with_args(json!({"data": {"url": "https://a.test/script.js"}}))]);
//!
//! let audit = BootupTimeAudit::with_defaults(Taxonomy::default_taxonomy()?);
//! let result = audit.audit(&TraceArtifacts::from_default_pass(trace))?;
//!
//! assert!(result.score);
//! assert_eq!(result.raw_value.as_ms(), 1500.4);
//! # Ok::<(), anyhow::Error>(())
//! ```

use crate::bootup::{
    aggregate, build_audit_result, extract_url_timings, AggregateError, AuditResult, Millis,
};
use crate::taxonomy::Taxonomy;
use crate::trace::{
    BottomUpGrouper, EventClassifier, EventStyleClassifier, GroupingEngine, GroupingError, Trace,
    TraceArtifacts, DEFAULT_PASS,
};
use thiserror::Error;

/// Pass/fail cutoff: boot-up time must stay under four seconds
pub const SCORE_THRESHOLD: Millis = Millis::from_whole_ms(4000);

/// Static description of the audit
#[derive(Debug, Clone, PartialEq)]
pub struct AuditMeta {
    pub name: &'static str,
    pub description: &'static str,
    pub failure_description: &'static str,
    pub help_text: &'static str,
    pub score_threshold: Millis,
}

impl Default for AuditMeta {
    fn default() -> Self {
        Self {
            name: "bootup-time",
            description: "JavaScript boot-up time is low",
            failure_description: "JavaScript boot-up time is too high",
            help_text: "Consider reducing the time spent parsing, compiling, and executing JS. \
                        Delivering smaller JS payloads helps.",
            score_threshold: SCORE_THRESHOLD,
        }
    }
}

impl AuditMeta {
    pub fn title(&self, score: bool) -> &'static str {
        if score {
            self.description
        } else {
            self.failure_description
        }
    }
}

/// Audit failures
#[derive(Error, Debug)]
pub enum AuditError {
    #[error("Failed to group trace events: {0}")]
    Grouping(#[from] GroupingError),

    #[error("Failed to aggregate boot-up time: {0}")]
    Aggregate(#[from] AggregateError),
}

/// Computes boot-up time from a trace
///
/// Holds no per-run state; one instance can audit any number of traces.
#[derive(Debug, Clone)]
pub struct BootupTimeAudit<G, C> {
    grouper: G,
    classifier: C,
    taxonomy: Taxonomy,
    meta: AuditMeta,
}

impl BootupTimeAudit<BottomUpGrouper, EventStyleClassifier> {
    /// Audit using the built-in grouper and event classifier
    pub fn with_defaults(taxonomy: Taxonomy) -> Self {
        Self::new(BottomUpGrouper::new(), EventStyleClassifier::new(), taxonomy)
    }
}

impl<G: GroupingEngine, C: EventClassifier> BootupTimeAudit<G, C> {
    pub fn new(grouper: G, classifier: C, taxonomy: Taxonomy) -> Self {
        Self {
            grouper,
            classifier,
            taxonomy,
            meta: AuditMeta::default(),
        }
    }

    pub fn meta(&self) -> &AuditMeta {
        &self.meta
    }

    pub fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }

    /// Audit the default pass
    pub fn audit(&self, artifacts: &TraceArtifacts) -> Result<AuditResult, AuditError> {
        self.audit_pass(artifacts, DEFAULT_PASS)
    }

    /// Audit a named pass; a missing pass audits as an empty trace
    pub fn audit_pass(
        &self,
        artifacts: &TraceArtifacts,
        pass: &str,
    ) -> Result<AuditResult, AuditError> {
        match artifacts.trace(pass) {
            Some(trace) => self.audit_trace(trace),
            None => {
                tracing::warn!(pass, "no trace recorded for pass, auditing empty trace");
                self.audit_trace(&Trace::default())
            }
        }
    }

    pub fn audit_trace(&self, trace: &Trace) -> Result<AuditResult, AuditError> {
        let tree = self.grouper.group(trace)?;
        let timings = extract_url_timings(&tree, &self.classifier);
        let aggregation = aggregate(&timings, &self.taxonomy)?;
        let result = build_audit_result(aggregation, timings, self.meta.score_threshold);

        tracing::info!(
            audit = self.meta.name,
            raw_value_ms = result.raw_value.as_ms(),
            score = result.score,
            rows = result.details.items.len(),
            "audit complete"
        );

        Ok(result)
    }
}
