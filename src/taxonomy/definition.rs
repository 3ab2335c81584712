use serde::{Deserialize, Serialize};

/// Heading key of the identity column. Reserved: no category may use it.
pub const URL_HEADING_KEY: &str = "url";

/// Category key that receives unmapped task time under [`UnmappedPolicy::Other`]
pub const OTHER_CATEGORY_KEY: &str = "other";

/// What the aggregator does with a task label the taxonomy does not know
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum UnmappedPolicy {
    /// Abort aggregation with an error naming the label
    #[default]
    Error,
    /// Attribute the time to the `other` category
    Other,
}

/// A coarse work category loaded from TOML configuration
///
/// # Example TOML
/// ```toml
/// [[category]]
/// key = "scriptGC"
/// label = "Garbage collection"
/// tasks = ["Minor GC", "Major GC", "DOM GC", "GC Event"]
/// ```
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct CategoryDefinition {
    /// Stable key used in table headings and row cells (e.g., "scripting")
    pub key: String,

    /// Human-readable heading text (e.g., "Script Evaluation")
    pub label: String,

    /// Task labels that roll up into this category
    #[serde(default)]
    pub tasks: Vec<String>,
}

impl CategoryDefinition {
    pub fn new(key: impl Into<String>, label: impl Into<String>, tasks: &[&str]) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            tasks: tasks.iter().map(|t| t.to_string()).collect(),
        }
    }

    pub fn contains(&self, task: &str) -> bool {
        self.tasks.iter().any(|t| t == task)
    }
}
