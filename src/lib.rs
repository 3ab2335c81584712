//! Arranque - JavaScript boot-up time audit for browser performance traces
//!
//! This library computes how much main-thread CPU time a page's scripts cost,
//! broken down by originating URL and by work category (script evaluation,
//! parse/compile, garbage collection, style & layout, ...), and reduces it to
//! a pass/fail score against a fixed four second budget.

pub mod audit;
pub mod bootup;
pub mod cli;
pub mod taxonomy;
pub mod text_output;
pub mod trace;
