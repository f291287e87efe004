// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Command orchestration.
//!
//! Glue between the merge and sync engines, the file helpers around them, and
//! the reports shown to the user. Every command writes its human readable
//! report to a caller supplied writer, so the binary can hand over stdout
//! while tests hand over a buffer.

use crate::{
    backup::{cleanup_backups, create_backup, BackupError, CleanupReport},
    merge::{merge, MergeReport},
    path::{ClaudeLayout, SETTINGS_FILE_NAME},
    report,
    settings::{load_settings, write_settings, SettingsError},
    sync::{sync_dir, SyncError, SyncReport},
};

use std::{
    fs::symlink_metadata,
    io::Write,
    path::{Path, PathBuf},
};
use tracing::{debug, instrument, warn};

/// Master and local Claude directories to operate on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    master: ClaudeLayout,
    local: ClaudeLayout,
}

impl Workspace {
    /// Construct new workspace from master config directory and home
    /// directory.
    pub fn new(config_dir: impl AsRef<Path>, home: impl AsRef<Path>) -> Self {
        Self {
            master: ClaudeLayout::new(config_dir),
            local: ClaudeLayout::new(home),
        }
    }

    /// Merge master settings into local settings.
    ///
    /// # Errors
    ///
    /// - Return [`CommandError`] if any step of [`run_settings`] fails.
    pub fn settings(&self, force: bool, out: &mut impl Write) -> Result<MergeReport> {
        run_settings(&self.master.settings(), &self.local.settings(), force, out)
    }

    /// Sync master agents into local agents.
    ///
    /// # Errors
    ///
    /// - Return [`CommandError`] if any step of [`run_sync`] fails.
    pub fn agents(&self, force: bool, out: &mut impl Write) -> Result<Option<SyncReport>> {
        run_sync("Agents", &self.master.agents(), &self.local.agents(), force, out)
    }

    /// Sync master skills into local skills.
    ///
    /// # Errors
    ///
    /// - Return [`CommandError`] if any step of [`run_sync`] fails.
    pub fn skills(&self, force: bool, out: &mut impl Write) -> Result<Option<SyncReport>> {
        run_sync("Skills", &self.master.skills(), &self.local.skills(), force, out)
    }

    /// Run settings, agents, and skills in sequence.
    ///
    /// Stops at first failure.
    ///
    /// # Errors
    ///
    /// - Return [`CommandError`] if any of the three steps fails.
    pub fn all(&self, force: bool, out: &mut impl Write) -> Result<()> {
        self.settings(force, out)?;
        self.agents(force, out)?;
        self.skills(force, out)?;

        Ok(())
    }

    /// Delete settings backups from local Claude directory.
    ///
    /// # Errors
    ///
    /// - Return [`CommandError`] if any step of [`run_cleanup`] fails.
    pub fn cleanup_bak(&self, out: &mut impl Write) -> Result<CleanupReport> {
        run_cleanup(self.local.claude_dir(), out)
    }
}

/// Merge master settings file into local settings file.
///
/// Nothing gets written if the merge neither added nor forced anything.
/// Otherwise the local file is backed up first, then atomically replaced with
/// the merged settings.
///
/// # Errors
///
/// - Return [`CommandError::LoadMaster`] or [`CommandError::LoadLocal`] if
///   either settings file cannot be loaded.
/// - Return [`CommandError::Backup`] if backup cannot be created.
/// - Return [`CommandError::WriteSettings`] if merged settings cannot be
///   written.
/// - Return [`CommandError::Report`] if report cannot be written out.
#[instrument(skip(master, local, out), level = "debug")]
pub fn run_settings(
    master: &Path,
    local: &Path,
    force: bool,
    out: &mut impl Write,
) -> Result<MergeReport> {
    let master_settings = load_settings(master).map_err(CommandError::LoadMaster)?;
    let local_settings = load_settings(local).map_err(CommandError::LoadLocal)?;

    let result = merge(&master_settings, &local_settings, force);
    report::write_merge_details(&result, out)?;

    if !result.has_changes() {
        debug!("{:?} already up to date", local.display());
        report::write_merge_unchanged(&result, out)?;
        return Ok(result);
    }

    let backup = create_backup(local)?;
    writeln!(out, "Backup created: {}", backup.display())?;

    write_settings(local, &result.merged).map_err(CommandError::WriteSettings)?;
    report::write_merge_written(&result, local, out)?;

    Ok(result)
}

/// Sync source directory into destination directory under given label.
///
/// Refuses to operate through a destination that is itself a symbolic link,
/// returning `None` after telling the user why. An empty sync result is
/// reported as either a missing source or nothing to sync.
///
/// # Errors
///
/// - Return [`CommandError::Sync`] if directory sync fails.
/// - Return [`CommandError::Report`] if report cannot be written out.
#[instrument(skip(source, dest, out), level = "debug")]
pub fn run_sync(
    label: &str,
    source: &Path,
    dest: &Path,
    force: bool,
    out: &mut impl Write,
) -> Result<Option<SyncReport>> {
    if symlink_metadata(dest).is_ok_and(|meta| meta.file_type().is_symlink()) {
        warn!("{label}: destination {:?} is a symbolic link", dest.display());
        writeln!(
            out,
            "{label}: destination {} is a symbolic link, skipping.",
            dest.display()
        )?;
        writeln!(
            out,
            "  If this symlink was created by mistake, remove it first: rm {:?}",
            dest.display().to_string()
        )?;
        return Ok(None);
    }

    let result = sync_dir(source, dest, force).map_err(|err| CommandError::Sync {
        label: label.to_string(),
        source: err,
    })?;

    if result.is_empty() {
        if source.is_dir() {
            writeln!(out, "{label}: nothing to sync")?;
        } else {
            writeln!(
                out,
                "{label}: source directory not found, skipping ({})",
                source.display()
            )?;
        }
        return Ok(Some(result));
    }

    report::write_sync_report(label, &result, out)?;

    Ok(Some(result))
}

/// Delete settings backups directly inside target Claude directory.
///
/// Every backup is attempted even if some fail to delete.
///
/// # Errors
///
/// - Return [`CommandError::Backup`] if directory cannot be listed.
/// - Return [`CommandError::CleanupIncomplete`] if any backup failed to
///   delete.
/// - Return [`CommandError::Report`] if report cannot be written out.
#[instrument(skip(out), level = "debug")]
pub fn run_cleanup(claude_dir: &Path, out: &mut impl Write) -> Result<CleanupReport> {
    let result = cleanup_backups(claude_dir, SETTINGS_FILE_NAME)?;
    report::write_cleanup_report(&result, claude_dir, out)?;

    if !result.is_success() {
        return Err(CommandError::CleanupIncomplete {
            failed: result.failed.iter().map(|(path, _)| path.clone()).collect(),
        });
    }

    Ok(result)
}

/// Command error types.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// Master settings cannot be loaded.
    #[error("failed to load master settings")]
    LoadMaster(#[source] SettingsError),

    /// Local settings cannot be loaded.
    #[error("failed to load local settings")]
    LoadLocal(#[source] SettingsError),

    /// Merged settings cannot be written.
    #[error("failed to write merged settings")]
    WriteSettings(#[source] SettingsError),

    /// Backup creation or listing fails.
    #[error(transparent)]
    Backup(#[from] BackupError),

    /// Directory sync fails.
    #[error("{label}: directory sync failed")]
    Sync {
        #[source]
        source: SyncError,
        label: String,
    },

    /// Some backups could not be deleted.
    #[error("failed to delete {} backup file(s)", failed.len())]
    CleanupIncomplete { failed: Vec<PathBuf> },

    /// Report cannot be written out.
    #[error("failed to write report")]
    Report(#[from] std::io::Error),
}

/// Friendly result alias :3
pub type Result<T, E = CommandError> = std::result::Result<T, E>;
