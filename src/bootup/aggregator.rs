// Category aggregation
//
// Regroups per-URL task durations into taxonomy categories, keeps the running
// boot-up total, and discovers the table's category columns in first-seen
// order (outer URL order, then inner task order).

use crate::bootup::extractor::UrlTimingMap;
use crate::bootup::millis::Millis;
use crate::taxonomy::{CategoryDefinition, Taxonomy, URL_HEADING_KEY};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// Rendering hint for a table column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    Url,
    Text,
}

/// Column descriptor of the boot-up table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Heading {
    pub key: String,
    pub item_type: ItemType,
    pub text: String,
}

impl Heading {
    pub fn url() -> Self {
        Self {
            key: URL_HEADING_KEY.to_string(),
            item_type: ItemType::Url,
            text: "URL".to_string(),
        }
    }

    pub fn category(category: &CategoryDefinition) -> Self {
        Self {
            key: category.key.clone(),
            item_type: ItemType::Text,
            text: category.label.clone(),
        }
    }
}

/// Ordered set of headings: `url` first, then categories by discovery
///
/// Column order is user-visible, so it is tracked explicitly rather than
/// derived from map iteration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct HeadingSet {
    headings: Vec<Heading>,
    #[serde(skip)]
    keys: HashSet<String>,
}

impl Default for HeadingSet {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadingSet {
    pub fn new() -> Self {
        let url = Heading::url();
        let mut keys = HashSet::new();
        keys.insert(url.key.clone());
        Self {
            headings: vec![url],
            keys,
        }
    }

    /// Append a heading unless its key is already present
    ///
    /// Returns `true` if the heading was added.
    pub fn insert(&mut self, heading: Heading) -> bool {
        if !self.keys.insert(heading.key.clone()) {
            return false;
        }
        self.headings.push(heading);
        true
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Heading> {
        self.headings.iter()
    }

    /// Category headings, without the leading `url` column
    pub fn categories(&self) -> &[Heading] {
        &self.headings[1..]
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.headings.iter().map(|h| h.key.as_str())
    }

    pub fn len(&self) -> usize {
        self.headings.len()
    }

    /// Always false: the `url` heading is never removed
    pub fn is_empty(&self) -> bool {
        self.headings.is_empty()
    }
}

/// Category key → summed duration for one URL
///
/// Only categories with a nonzero contribution are stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryTotals {
    totals: Vec<(String, Millis)>,
    /// Category key → index into `totals`
    index: HashMap<String, usize>,
}

impl CategoryTotals {
    pub fn add(&mut self, key: &str, duration: Millis) {
        if duration.is_zero() {
            return;
        }
        match self.index.get(key) {
            Some(&position) => self.totals[position].1 += duration,
            None => {
                self.index.insert(key.to_string(), self.totals.len());
                self.totals.push((key.to_string(), duration));
            }
        }
    }

    /// Total for `key`, zero if the URL had no time in that category
    pub fn get(&self, key: &str) -> Millis {
        self.index
            .get(key)
            .map(|&position| self.totals[position].1)
            .unwrap_or(Millis::ZERO)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Millis)> {
        self.totals.iter().map(|(k, total)| (k.as_str(), *total))
    }

    pub fn len(&self) -> usize {
        self.totals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    pub fn total(&self) -> Millis {
        self.totals.iter().map(|(_, total)| *total).sum()
    }
}

/// Category totals of one URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlCategoryTotals {
    pub url: String,
    pub totals: CategoryTotals,
}

/// Output of [`aggregate`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryAggregation {
    pub urls: Vec<UrlCategoryTotals>,
    pub headings: HeadingSet,
    /// Boot-up time: every task duration of every URL
    pub total: Millis,
}

/// Aggregation failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AggregateError {
    #[error("Task '{label}' on {url} has no category in the taxonomy")]
    UnmappedTask { url: String, label: String },
}

/// Regroup task durations by category
///
/// Labels missing from the taxonomy abort with
/// [`AggregateError::UnmappedTask`] unless the taxonomy routes them to its
/// `other` category.
///
/// # Example
/// ```
/// use arranque::bootup::{aggregate, Millis, UrlTimingMap};
/// use arranque::taxonomy::Taxonomy;
///
/// let mut timings = UrlTimingMap::new();
/// let app = timings.entry("https://a.test/script.js");
/// app.add("Evaluate Script", Millis::from_ms(1500.4));
/// app.add("Parse Script", Millis::from_ms(200.1));
///
/// let taxonomy = Taxonomy::default_taxonomy()?;
/// let aggregation = aggregate(&timings, &taxonomy)?;
///
/// assert_eq!(aggregation.total.as_ms(), 1700.5);
/// let keys: Vec<&str> = aggregation.headings.keys().collect();
/// assert_eq!(keys, vec!["url", "scripting", "scriptParseCompile"]);
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn aggregate(
    timings: &UrlTimingMap,
    taxonomy: &Taxonomy,
) -> Result<CategoryAggregation, AggregateError> {
    let mut headings = HeadingSet::new();
    let mut urls = Vec::with_capacity(timings.len());
    let mut total = Millis::ZERO;

    for entry in timings.iter() {
        let mut totals = CategoryTotals::default();

        for task in entry.tasks() {
            total += task.duration;

            let category = match taxonomy.category_for(&task.label) {
                Some(category) => category,
                None => {
                    let fallback = taxonomy.fallback_category().ok_or_else(|| {
                        AggregateError::UnmappedTask {
                            url: entry.url.clone(),
                            label: task.label.clone(),
                        }
                    })?;
                    tracing::warn!(
                        url = %entry.url,
                        label = %task.label,
                        category = %fallback.key,
                        "task label not in taxonomy, attributing to fallback category"
                    );
                    fallback
                }
            };

            totals.add(&category.key, task.duration);
            if headings.insert(Heading::category(category)) {
                tracing::trace!(key = %category.key, "discovered category column");
            }
        }

        urls.push(UrlCategoryTotals {
            url: entry.url.clone(),
            totals,
        });
    }

    tracing::debug!(
        urls = urls.len(),
        columns = headings.len(),
        total_ms = total.as_ms(),
        "aggregated boot-up time by category"
    );

    Ok(CategoryAggregation {
        urls,
        headings,
        total,
    })
}
