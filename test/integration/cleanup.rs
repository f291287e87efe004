// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

use crate::{capture, ClaudeFixture};

use anyhow::Result;
use claude_config_merge::command::CommandError;
use pretty_assertions::assert_eq;

#[test]
fn cleanup_deletes_backups_made_by_settings() -> Result<()> {
    let fixture = ClaudeFixture::new()?;
    fixture.write_master("settings.json", r#"{"model": "opus"}"#)?;
    fixture.write_local("settings.json", "{}")?;
    fixture.write_local("settings.json.20250101T000000.000.bak", "{}")?;
    fixture.write_local("notes.txt.bak", "keep")?;

    let (result, _) = capture(|out| fixture.workspace().settings(false, out));
    result?;
    assert_eq!(fixture.local_backups()?.len(), 2);

    let (result, output) = capture(|out| fixture.workspace().cleanup_bak(out));
    let report = result?;
    assert_eq!(report.deleted.len(), 2);
    assert!(fixture.local_backups()?.is_empty());
    assert!(fixture.local("settings.json").exists());
    assert!(fixture.local("notes.txt.bak").exists());
    assert!(output.contains("  Deleted: settings.json.20250101T000000.000.bak\n"));
    assert!(output.contains("Deleted 2 of 2 backup file(s) from "));

    Ok(())
}

#[test]
fn cleanup_with_no_backups() -> Result<()> {
    let fixture = ClaudeFixture::new()?;

    let (result, output) = capture(|out| fixture.workspace().cleanup_bak(out));
    assert_eq!(result?.total(), 0);
    assert!(output.starts_with("No backup files found in "));

    Ok(())
}

#[test]
fn cleanup_missing_claude_dir() -> Result<()> {
    let fixture = ClaudeFixture::new()?;
    std::fs::remove_dir_all(fixture.local(""))?;

    let (result, _) = capture(|out| fixture.workspace().cleanup_bak(out));
    assert!(matches!(result, Err(CommandError::Backup(_))));

    Ok(())
}

#[cfg(unix)]
#[test]
fn cleanup_partial_failure_keeps_going() -> Result<()> {
    use std::{fs, os::unix::fs::PermissionsExt};

    let fixture = ClaudeFixture::new()?;
    fixture.write_local("settings.json.20250101T000000.000.bak", "{}")?;
    fixture.write_local("settings.json.20250102T000000.000.bak", "{}")?;

    // Deleting entries requires write access to the directory holding them.
    let claude_dir = fixture.local("");
    fs::set_permissions(&claude_dir, fs::Permissions::from_mode(0o500))?;
    let probe = claude_dir.join(".probe");
    let writable = fs::write(&probe, "").is_ok();
    let (result, output) = capture(|out| fixture.workspace().cleanup_bak(out));
    fs::set_permissions(&claude_dir, fs::Permissions::from_mode(0o700))?;

    // Running as root bypasses directory permissions entirely.
    if writable {
        return Ok(());
    }

    match result {
        Err(CommandError::CleanupIncomplete { failed }) => assert_eq!(failed.len(), 2),
        other => panic!("expected incomplete cleanup, got {other:?}"),
    }
    assert!(output.contains("Error deleting settings.json.20250101T000000.000.bak"));
    assert!(output.contains("Error deleting settings.json.20250102T000000.000.bak"));
    assert!(output.contains("Deleted 0 of 2 backup file(s)"));

    Ok(())
}
