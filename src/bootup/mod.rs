// Boot-up time aggregation pipeline
//
// GroupTree ──extract──▶ UrlTimingMap ──aggregate──▶ CategoryAggregation
//                                                        │
//                                             build_audit_result
//                                                        ▼
//                                                   AuditResult
//
// Every stage is a pure single pass over owned data. Durations are exact
// tenths of a millisecond, so the grand total equals the sum of every row and
// every row equals the sum of its cells.

mod aggregator;
mod extractor;
mod millis;
mod report;

pub use aggregator::{
    aggregate, AggregateError, CategoryAggregation, CategoryTotals, Heading, HeadingSet,
    ItemType, UrlCategoryTotals,
};
pub use extractor::{
    extract_url_timings, is_attributable_url, TaskDuration, UrlTimingMap, UrlTimings, ABOUT_BLANK,
};
pub use millis::{format_millis, Millis};
pub use report::{
    build_audit_result, AuditResult, ExtendedInfo, ReportRow, TableDetails, CELL_GRANULARITY_MS,
    DISPLAY_GRANULARITY_MS,
};

#[cfg(test)]
mod tests;
