//! Human-readable and JSON rendering of walk results.
//!
//! Nothing in `inventory` formats output; everything a user sees goes through here.

use crate::inventory::{RemoteEntry, SkippedDirectory, Traversal};
use serde::Serialize;
use std::io::{self, Write};

const PATH_WIDTH: usize = 50;
const TYPE_WIDTH: usize = 12;
const SIZE_WIDTH: usize = 15;
const RULE_WIDTH: usize = 110;
const SIZE_UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// Formats bytes with two decimals in powers of 1024, like `1.50 KB`.
pub fn format_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 B".to_string();
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.2} {}", value, SIZE_UNITS[unit])
}

/// Writes one titled table of entries, followed by the item count.
pub fn render_table(out: &mut impl Write, title: &str, entries: &[&RemoteEntry]) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "=== {title} ===")?;
    writeln!(
        out,
        "{:<PATH_WIDTH$} | {:<TYPE_WIDTH$} | {:<SIZE_WIDTH$} | {}",
        "Path", "Type", "Size", "Last Modified"
    )?;
    writeln!(out, "{}", "-".repeat(RULE_WIDTH))?;

    for entry in entries {
        let (kind, size) = if entry.is_directory() {
            ("Directory", "-".to_string())
        } else {
            ("File", format_size(entry.size()))
        };
        writeln!(
            out,
            "{:<PATH_WIDTH$} | {:<TYPE_WIDTH$} | {:<SIZE_WIDTH$} | {}",
            entry.relative_path(),
            kind,
            size,
            entry.last_modified().format("%Y-%m-%d %H:%M:%S UTC")
        )?;
    }

    writeln!(out)?;
    writeln!(out, "Total items: {}", entries.len())
}

/// Lists the subtrees a walk couldn't read. Writes nothing when there are none.
pub fn render_skipped(out: &mut impl Write, skipped: &[SkippedDirectory]) -> io::Result<()> {
    if skipped.is_empty() {
        return Ok(());
    }
    writeln!(out, "Skipped (unreadable) directories: {}", skipped.len())?;
    for dir in skipped {
        writeln!(out, "  {} ({}: {})", dir.relative_path, dir.error.category(), dir.error.cause())?;
    }
    Ok(())
}

/// Notes a cancelled walk so partial output isn't mistaken for a full one.
pub fn render_cancelled(out: &mut impl Write, traversal: &Traversal) -> io::Result<()> {
    if traversal.is_cancelled() {
        writeln!(out, "Walk cancelled; results are partial.")?;
    }
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonReport<'a> {
    entries: &'a [&'a RemoteEntry],
    skipped: &'a [SkippedDirectory],
    cancelled: bool,
}

/// Writes a view of a traversal as one pretty-printed JSON object.
pub fn render_json(out: &mut impl Write, traversal: &Traversal, entries: &[&RemoteEntry]) -> io::Result<()> {
    let report = JsonReport {
        entries,
        skipped: traversal.skipped(),
        cancelled: traversal.is_cancelled(),
    };
    serde_json::to_writer_pretty(&mut *out, &report).map_err(io::Error::other)?;
    writeln!(out)
}
