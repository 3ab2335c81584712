//! Text output format for the boot-up audit

use crate::audit::AuditMeta;
use crate::bootup::AuditResult;
use std::fmt::{self, Write};

const URL_WIDTH: usize = 50;
const MIN_CELL_WIDTH: usize = 12;

/// Render the audit result as a fixed-width table
///
/// Long URLs are shortened from the left so the file name stays visible.
pub fn format_text_report(result: &AuditResult, meta: &AuditMeta) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail
    let _ = write_report(&mut out, result, meta);
    out
}

fn write_report(out: &mut String, result: &AuditResult, meta: &AuditMeta) -> fmt::Result {
    let verdict = if result.score { "PASS" } else { "FAIL" };
    let categories = result.details.headings.categories();

    let widths: Vec<usize> = categories
        .iter()
        .map(|h| h.text.chars().count().max(MIN_CELL_WIDTH))
        .collect();
    let rule = "─".repeat(URL_WIDTH + widths.iter().map(|w| w + 1).sum::<usize>());

    writeln!(out, "{} [{}]: {}", meta.name, verdict, meta.title(result.score))?;
    writeln!(
        out,
        "Total boot-up time: {} (threshold {})",
        result.display_value,
        meta.score_threshold.format(1.0)
    )?;

    if result.details.items.is_empty() {
        return writeln!(out, "\nNo script boot-up time recorded.");
    }

    writeln!(out)?;
    write!(out, "{:<width$}", "URL", width = URL_WIDTH)?;
    for (heading, width) in categories.iter().zip(&widths) {
        write!(out, " {:>width$}", heading.text, width = *width)?;
    }
    writeln!(out)?;
    writeln!(out, "{}", rule)?;

    for row in &result.details.items {
        write!(
            out,
            "{:<width$}",
            shorten_url(&row.url, URL_WIDTH),
            width = URL_WIDTH
        )?;
        for (heading, width) in categories.iter().zip(&widths) {
            let cell = row.cell(&heading.key).unwrap_or_default();
            write!(out, " {:>width$}", cell, width = *width)?;
        }
        writeln!(out)?;
    }

    writeln!(out, "{}", rule)?;
    writeln!(out, "{}", meta.help_text)
}

fn shorten_url(url: &str, width: usize) -> String {
    let len = url.chars().count();
    if len <= width {
        return url.to_string();
    }
    let keep: String = url.chars().skip(len - (width - 1)).collect();
    format!("…{}", keep)
}
