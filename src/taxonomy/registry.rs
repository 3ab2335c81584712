use crate::taxonomy::definition::{
    CategoryDefinition, UnmappedPolicy, OTHER_CATEGORY_KEY, URL_HEADING_KEY,
};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Structural problems in a taxonomy definition
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaxonomyError {
    #[error("Duplicate task '{task}' in categories '{first}' and '{second}'")]
    DuplicateTask {
        task: String,
        first: String,
        second: String,
    },

    #[error("Duplicate category key '{0}'")]
    DuplicateCategory(String),

    #[error("Category key '{0}' is reserved for the URL column")]
    ReservedKey(String),

    #[error("on_unmapped = \"other\" requires a category with key 'other'")]
    MissingOtherCategory,
}

#[derive(Deserialize)]
struct TaxonomyFile {
    #[serde(default)]
    on_unmapped: UnmappedPolicy,
    category: Vec<CategoryDefinition>,
}

/// Immutable mapping from task label to coarse category
///
/// Built once per run and passed explicitly into the aggregator.
///
/// # Example Usage
/// ```
/// use arranque::taxonomy::Taxonomy;
///
/// let taxonomy = Taxonomy::default_taxonomy()?;
/// let category = taxonomy.category_for("Evaluate Script").unwrap();
/// assert_eq!(category.key, "scripting");
/// # Ok::<(), anyhow::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Taxonomy {
    /// All categories in declaration order
    categories: Vec<CategoryDefinition>,

    /// Fast lookup: task label → index into `categories`
    task_to_category: HashMap<String, usize>,

    on_unmapped: UnmappedPolicy,
}

impl Taxonomy {
    /// Build a taxonomy from category definitions
    ///
    /// # Errors
    /// Rejects duplicate category keys, the reserved `url` key, a task listed
    /// under two categories, and `Other` policy without an `other` category.
    pub fn from_definitions(
        categories: Vec<CategoryDefinition>,
        on_unmapped: UnmappedPolicy,
    ) -> std::result::Result<Self, TaxonomyError> {
        let mut task_to_category = HashMap::new();

        for (index, category) in categories.iter().enumerate() {
            if category.key == URL_HEADING_KEY {
                return Err(TaxonomyError::ReservedKey(category.key.clone()));
            }
            if categories[..index].iter().any(|c| c.key == category.key) {
                return Err(TaxonomyError::DuplicateCategory(category.key.clone()));
            }

            for task in &category.tasks {
                if let Some(existing) = task_to_category.insert(task.clone(), index) {
                    return Err(TaxonomyError::DuplicateTask {
                        task: task.clone(),
                        first: categories[existing].key.clone(),
                        second: category.key.clone(),
                    });
                }
            }
        }

        if on_unmapped == UnmappedPolicy::Other
            && !categories.iter().any(|c| c.key == OTHER_CATEGORY_KEY)
        {
            return Err(TaxonomyError::MissingOtherCategory);
        }

        Ok(Self {
            categories,
            task_to_category,
            on_unmapped,
        })
    }

    /// Load a taxonomy from a TOML file
    ///
    /// # Example TOML
    /// ```toml
    /// on_unmapped = "other"
    ///
    /// [[category]]
    /// key = "scripting"
    /// label = "Script Evaluation"
    /// tasks = ["Evaluate Script", "Function Call"]
    ///
    /// [[category]]
    /// key = "other"
    /// label = "Other"
    /// tasks = ["Task"]
    /// ```
    pub fn from_toml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).with_context(|| {
            format!("Failed to read taxonomy file: {}", path.as_ref().display())
        })?;

        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid taxonomy file: {}", path.as_ref().display()))
    }

    /// Parse a taxonomy from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: TaxonomyFile =
            toml::from_str(content).context("Failed to parse TOML taxonomy definitions")?;

        Ok(Self::from_definitions(file.category, file.on_unmapped)?)
    }

    /// Load the default taxonomy embedded in the binary
    ///
    /// Covers every title the default event classifier can emit.
    pub fn default_taxonomy() -> Result<Self> {
        const DEFAULT_TOML: &str = include_str!("../../taxonomy-default.toml");

        Self::from_toml_str(DEFAULT_TOML).context("Failed to parse embedded taxonomy-default.toml")
    }

    /// Resolve the category for a task label
    ///
    /// Returns `None` for labels outside the taxonomy; the caller decides
    /// what that means via [`Taxonomy::on_unmapped`].
    pub fn category_for(&self, task: &str) -> Option<&CategoryDefinition> {
        self.task_to_category
            .get(task)
            .map(|&index| &self.categories[index])
    }

    /// Get category definition by key
    pub fn get_category(&self, key: &str) -> Option<&CategoryDefinition> {
        self.categories.iter().find(|c| c.key == key)
    }

    /// Category that absorbs unmapped labels, if the policy asks for one
    pub fn fallback_category(&self) -> Option<&CategoryDefinition> {
        match self.on_unmapped {
            UnmappedPolicy::Error => None,
            UnmappedPolicy::Other => self.get_category(OTHER_CATEGORY_KEY),
        }
    }

    pub fn on_unmapped(&self) -> UnmappedPolicy {
        self.on_unmapped
    }

    /// Get all defined categories
    pub fn categories(&self) -> &[CategoryDefinition] {
        &self.categories
    }
}
