//! CLI argument parsing for Arranque

use crate::trace::DEFAULT_PASS;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for the audit result
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table (default)
    Text,
    /// JSON audit result for machine parsing
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "arranque")]
#[command(version)]
#[command(about = "JavaScript boot-up time audit for browser performance traces", long_about = None)]
pub struct Cli {
    /// Trace file: artifacts JSON, a Chrome trace object, or an event array
    #[arg(value_name = "TRACE")]
    pub trace: PathBuf,

    /// Custom task taxonomy (TOML); defaults to the embedded taxonomy
    #[arg(long = "taxonomy", value_name = "FILE")]
    pub taxonomy: Option<PathBuf>,

    /// Output format
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Name of the trace pass to audit
    #[arg(long = "pass", value_name = "NAME", default_value = DEFAULT_PASS)]
    pub pass: String,

    /// Exit with status 1 when boot-up time fails the threshold
    #[arg(long = "check")]
    pub check: bool,

    /// Enable debug tracing output to stderr
    #[arg(long = "debug")]
    pub debug: bool,
}
