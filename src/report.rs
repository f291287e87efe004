// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Human readable reports.
//!
//! Render merge, sync, and cleanup results for display on a terminal. Nothing
//! here feeds back into the engines that produced the results.

use crate::{backup::CleanupReport, merge::MergeReport, sync::SyncReport};

use serde_json::Value;
use std::{io::Write, path::Path};

const SEPARATOR: &str = "  ------------------------------------------------------------";

/// Write conflict, forced, matching, and local-only sections of merge report.
///
/// Empty sections are left out entirely.
pub fn write_merge_details(report: &MergeReport, out: &mut impl Write) -> std::io::Result<()> {
    if !report.conflicts.is_empty() {
        writeln!(out, "\nConflicts (local value kept):")?;
        for conflict in &report.conflicts {
            writeln!(out, "\n{SEPARATOR}")?;
            writeln!(out, "  {}", conflict.key)?;
            writeln!(out, "    master: {}", format_value(&conflict.master))?;
            writeln!(out, "    local:  {}", format_value(&conflict.local))?;
        }
        writeln!(out, "\n{SEPARATOR}\n")?;
    }

    if !report.forced.is_empty() {
        writeln!(out, "\nForced overwrites (master value applied):")?;
        for key in &report.forced {
            writeln!(out, "\n{SEPARATOR}")?;
            writeln!(out, "  {key}")?;
        }
        writeln!(out, "\n{SEPARATOR}\n")?;
    }

    write_key_list(out, "Matching keys:", &report.matching)?;
    write_key_list(out, "Local-only keys (not in master):", &report.local_only)?;

    Ok(())
}

/// Write summary for a merge that changed nothing.
pub fn write_merge_unchanged(report: &MergeReport, out: &mut impl Write) -> std::io::Result<()> {
    writeln!(
        out,
        "No changes to write. Keys added: 0  |  Conflicts: {}  |  Matching: {}  |  Local-only: {}",
        report.conflicts.len(),
        report.matching.len(),
        report.local_only.len()
    )
}

/// Write summary for a merge that was written to target path.
pub fn write_merge_written(
    report: &MergeReport,
    path: &Path,
    out: &mut impl Write,
) -> std::io::Result<()> {
    write_key_list(out, "Keys added:", &report.added)?;
    writeln!(
        out,
        "Done. Keys added: {}  |  Forced: {}  |  Conflicts: {}  |  Matching: {}  |  Local-only: {}",
        report.added.len(),
        report.forced.len(),
        report.conflicts.len(),
        report.matching.len(),
        report.local_only.len()
    )?;
    writeln!(out, "Written to: {}", path.display())
}

/// Write sync report under given label, e.g., "Agents".
///
/// Callers are expected to handle the empty report case themselves, since
/// only they can tell a missing source from an empty one.
pub fn write_sync_report(
    label: &str,
    report: &SyncReport,
    out: &mut impl Write,
) -> std::io::Result<()> {
    writeln!(
        out,
        "{label}: copied {}, skipped {}, forced {}",
        report.copied.len(),
        report.skipped.len(),
        report.forced.len()
    )?;

    for (heading, names) in [
        ("Copied:", &report.copied),
        ("Skipped (use -f to overwrite):", &report.skipped),
        ("Forced:", &report.forced),
    ] {
        if names.is_empty() {
            continue;
        }

        writeln!(out, "  {heading}")?;
        for name in names {
            writeln!(out, "    {name}")?;
        }
    }

    Ok(())
}

/// Write backup cleanup report for target directory.
pub fn write_cleanup_report(
    report: &CleanupReport,
    dir: &Path,
    out: &mut impl Write,
) -> std::io::Result<()> {
    if report.total() == 0 {
        return writeln!(out, "No backup files found in {}", dir.display());
    }

    for path in &report.deleted {
        writeln!(out, "  Deleted: {}", file_name(path))?;
    }

    for (path, error) in &report.failed {
        writeln!(out, "  Error deleting {}: {error}", file_name(path))?;
    }

    writeln!(
        out,
        "\nDeleted {} of {} backup file(s) from {}",
        report.deleted.len(),
        report.total(),
        dir.display()
    )
}

fn write_key_list(out: &mut impl Write, heading: &str, keys: &[String]) -> std::io::Result<()> {
    if keys.is_empty() {
        return Ok(());
    }

    writeln!(out, "{heading}")?;
    for key in keys {
        writeln!(out, "  {key}")?;
    }
    writeln!(out)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Format conflicting value for display.
///
/// Objects and lists are pretty printed, with continuation lines indented so
/// they align under the "master:" and "local:" labels. Scalars stay compact.
pub fn format_value(value: &Value) -> String {
    match value {
        Value::Object(_) | Value::Array(_) => serde_json::to_string_pretty(value)
            .unwrap_or_else(|_| value.to_string())
            .replace('\n', "\n    "),
        _ => value.to_string(),
    }
}
