//! Table & score builder

use crate::bootup::aggregator::{CategoryAggregation, HeadingSet};
use crate::bootup::extractor::UrlTimingMap;
use crate::bootup::millis::Millis;
use crate::taxonomy::URL_HEADING_KEY;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

/// Rounding of table cells; fine enough that cells sum to the row total
pub const CELL_GRANULARITY_MS: f64 = 0.1;

/// Rounding of the headline display value
pub const DISPLAY_GRANULARITY_MS: f64 = 10.0;

/// One table row: the URL and a formatted duration per category column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub url: String,
    /// (heading key, formatted duration) in heading order
    pub cells: Vec<(String, String)>,
}

impl ReportRow {
    pub fn cell(&self, key: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

impl Serialize for ReportRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.cells.len() + 1))?;
        map.serialize_entry(URL_HEADING_KEY, &self.url)?;
        for (key, value) in &self.cells {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Table payload of the audit result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableDetails {
    pub headings: HeadingSet,
    pub items: Vec<ReportRow>,
}

/// Diagnostics: raw per-URL task durations
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtendedInfo {
    pub value: UrlTimingMap,
}

/// Final result of one boot-up audit run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditResult {
    /// Pass/fail: boot-up time under the threshold
    pub score: bool,
    /// Boot-up time in milliseconds
    pub raw_value: Millis,
    pub display_value: String,
    pub details: TableDetails,
    pub extended_info: ExtendedInfo,
}

/// Build the table and score from an aggregation
///
/// Never fails: an empty aggregation yields zero rows, zero total, and a
/// passing score. A total equal to the threshold fails.
pub fn build_audit_result(
    aggregation: CategoryAggregation,
    timings: UrlTimingMap,
    threshold: Millis,
) -> AuditResult {
    let CategoryAggregation {
        urls,
        headings,
        total,
    } = aggregation;

    let items = urls
        .into_iter()
        .map(|entry| ReportRow {
            cells: headings
                .categories()
                .iter()
                .map(|heading| {
                    let value = entry.totals.get(&heading.key).format(CELL_GRANULARITY_MS);
                    (heading.key.clone(), value)
                })
                .collect(),
            url: entry.url,
        })
        .collect();

    let score = total < threshold;
    tracing::debug!(
        total_ms = total.as_ms(),
        threshold_ms = threshold.as_ms(),
        score,
        "scored boot-up time"
    );

    AuditResult {
        score,
        raw_value: total,
        display_value: total.format(DISPLAY_GRANULARITY_MS),
        details: TableDetails { headings, items },
        extended_info: ExtendedInfo { value: timings },
    }
}
