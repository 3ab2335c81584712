// TOML-Based Task Taxonomy
//
// Maps fine-grained task labels ("Evaluate Script", "Minor GC", ...) onto the
// coarse categories that become the boot-up table's columns. The mapping is
// configuration, not code: a custom taxonomy can be loaded from TOML, and the
// default pack is embedded in the binary.

mod definition;
mod registry;

pub use definition::{CategoryDefinition, UnmappedPolicy, OTHER_CATEGORY_KEY, URL_HEADING_KEY};
pub use registry::{Taxonomy, TaxonomyError};
