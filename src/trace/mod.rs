//! Trace input: artifacts, events, and the grouping/classification seams
//!
//! The boot-up audit consumes traces only through [`GroupingEngine`] and
//! [`EventClassifier`]. [`BottomUpGrouper`] and [`EventStyleClassifier`] are
//! the built-in implementations used by the CLI.

mod artifacts;
mod bottom_up;
mod event;
mod event_style;
mod tree;

pub use artifacts::{Trace, TraceArtifacts, DEFAULT_PASS};
pub use bottom_up::BottomUpGrouper;
pub use event::{Phase, TraceEvent};
pub use event_style::{EventStyleClassifier, FALLBACK_TITLE};
pub use tree::{
    EventClassifier, EventStyle, GroupTree, GroupingEngine, GroupingError, SelfTime, TaskNode,
    UrlNode,
};
