// URL timing extraction
//
// Flattens the bottom-up tree into URL → (task label → self time), dropping
// time that belongs to no script resource.

use crate::bootup::millis::Millis;
use crate::trace::{EventClassifier, GroupTree};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::HashMap;

/// URL of the blank page; never attributable to a script
pub const ABOUT_BLANK: &str = "about:blank";

/// Whether time grouped under `url` can be attributed to a resource
pub fn is_attributable_url(url: &str) -> bool {
    !url.is_empty() && url != ABOUT_BLANK
}

/// Summed self time of one task label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDuration {
    pub label: String,
    pub duration: Millis,
}

/// Task durations for one URL, in first-seen order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlTimings {
    pub url: String,
    tasks: Vec<TaskDuration>,
    /// Task label → index into `tasks`
    index: HashMap<String, usize>,
}

impl UrlTimings {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            tasks: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Add time under `label`, summing with any earlier entry
    pub fn add(&mut self, label: &str, duration: Millis) {
        match self.index.get(label) {
            Some(&position) => self.tasks[position].duration += duration,
            None => {
                self.index.insert(label.to_string(), self.tasks.len());
                self.tasks.push(TaskDuration {
                    label: label.to_string(),
                    duration,
                });
            }
        }
    }

    pub fn get(&self, label: &str) -> Option<Millis> {
        self.index
            .get(label)
            .map(|&position| self.tasks[position].duration)
    }

    pub fn tasks(&self) -> &[TaskDuration] {
        &self.tasks
    }

    pub fn total(&self) -> Millis {
        self.tasks.iter().map(|t| t.duration).sum()
    }
}

/// URL → task label → self time, in tree order
///
/// Serializes as a nested JSON object with keys in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlTimingMap {
    entries: Vec<UrlTimings>,
    /// URL → index into `entries`
    index: HashMap<String, usize>,
}

impl UrlTimingMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entry for `url`, created empty on first use
    pub fn entry(&mut self, url: &str) -> &mut UrlTimings {
        let position = match self.index.get(url) {
            Some(&position) => position,
            None => {
                self.index.insert(url.to_string(), self.entries.len());
                self.entries.push(UrlTimings::new(url));
                self.entries.len() - 1
            }
        };
        &mut self.entries[position]
    }

    pub fn get(&self, url: &str) -> Option<&UrlTimings> {
        self.index.get(url).map(|&position| &self.entries[position])
    }

    pub fn iter(&self) -> impl Iterator<Item = &UrlTimings> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of every task duration across every URL
    pub fn total(&self) -> Millis {
        self.entries.iter().map(UrlTimings::total).sum()
    }
}

struct TaskMap<'a>(&'a [TaskDuration]);

impl Serialize for TaskMap<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for task in self.0 {
            map.serialize_entry(&task.label, &task.duration)?;
        }
        map.end()
    }
}

impl Serialize for UrlTimingMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(&entry.url, &TaskMap(&entry.tasks))?;
        }
        map.end()
    }
}

/// Extract per-URL task durations from a bottom-up tree
///
/// Skips URL nodes keyed `""` or `about:blank`. Each task's self time is
/// rounded to one decimal place before being summed under the classifier's
/// title. A URL node without task children yields an empty entry.
///
/// # Example
/// ```
/// use arranque::bootup::extract_url_timings;
/// use arranque::trace::{EventStyle, GroupTree, SelfTime, TraceEvent, UrlNode};
///
/// let tree = GroupTree::new(vec![
///     UrlNode::new("about:blank")
///         .with_task(SelfTime::Millis(50.0), TraceEvent::complete("Task", 0.0, 50.0)),
///     UrlNode::new("https://a.test/app.js")
///         .with_task(SelfTime::Millis(12.34), TraceEvent::complete("EvaluateScript", 0.0, 0.0)),
/// ]);
///
/// let classify = |_: &TraceEvent| EventStyle::new("Evaluate Script");
/// let timings = extract_url_timings(&tree, &classify);
///
/// assert_eq!(timings.len(), 1);
/// let app = timings.get("https://a.test/app.js").unwrap();
/// assert_eq!(app.get("Evaluate Script").unwrap().as_ms(), 12.3);
/// ```
pub fn extract_url_timings<C: EventClassifier + ?Sized>(
    tree: &GroupTree,
    classifier: &C,
) -> UrlTimingMap {
    let mut timings = UrlTimingMap::new();

    for node in &tree.children {
        if !is_attributable_url(&node.url) {
            tracing::trace!(url = %node.url, "skipping unattributable url");
            continue;
        }

        let entry = timings.entry(&node.url);
        for task in &node.children {
            let style = classifier.classify(&task.event);
            entry.add(&style.title, Millis::from_ms(task.self_time.as_millis()));
        }
    }

    timings
}
