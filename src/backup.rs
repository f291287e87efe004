// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Timestamped backups.
//!
//! Before a settings file gets replaced, a byte-identical copy of it is placed
//! next to it as `<path>.<timestamp>.bak`. The timestamp carries millisecond
//! granularity, e.g., `settings.json.20250102T150405.123.bak`, so repeated
//! runs in quick succession do not clobber each other's backups.
//!
//! Backups pile up over time, so they can also be cleaned up in bulk.

use crate::atomic::{write_atomic, AtomicError};

use chrono::Local;
use glob::{MatchOptions, Pattern};
use std::{
    fs::{read, read_dir, remove_file},
    path::{Path, PathBuf},
};
use tracing::{debug, instrument, warn};

/// Timestamp layout used in backup file names.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%dT%H%M%S%.3f";

/// Create timestamped backup of target file.
///
/// Returns path to the new backup.
///
/// # Errors
///
/// - Return [`BackupError::Read`] if target file cannot be read.
/// - Return [`BackupError::Write`] if backup cannot be written.
#[instrument(level = "debug")]
pub fn create_backup(path: &Path) -> Result<PathBuf> {
    let contents = read(path).map_err(|err| BackupError::Read {
        source: err,
        path: path.to_path_buf(),
    })?;

    let mut backup_path = path.as_os_str().to_owned();
    backup_path.push(format!(".{}.bak", Local::now().format(TIMESTAMP_FORMAT)));
    let backup_path = PathBuf::from(backup_path);

    write_atomic(&backup_path, &contents, None)?;
    debug!("backup created at {:?}", backup_path.display());

    Ok(backup_path)
}

/// Result of backup cleanup.
///
/// Every matching backup is attempted independently. Failures do not stop
/// the remaining deletions.
#[derive(Debug, Default)]
pub struct CleanupReport {
    /// Backups that were deleted.
    pub deleted: Vec<PathBuf>,

    /// Backups that could not be deleted, along with reason why.
    pub failed: Vec<(PathBuf, std::io::Error)>,
}

impl CleanupReport {
    /// Total number of backups found.
    pub fn total(&self) -> usize {
        self.deleted.len() + self.failed.len()
    }

    /// Check if every backup found was deleted.
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Delete backups of file named `file_name` directly inside `dir`.
///
/// Only regular top-level entries of `dir` matching `<file_name>.*.bak` are
/// considered. Subdirectories are never touched.
///
/// # Errors
///
/// - Return [`BackupError::ReadDir`] if `dir` cannot be listed.
/// - Return [`BackupError::Pattern`] if `file_name` makes an invalid pattern.
#[instrument(level = "debug")]
pub fn cleanup_backups(dir: &Path, file_name: &str) -> Result<CleanupReport> {
    let pattern = Pattern::new(&format!("{}.*.bak", Pattern::escape(file_name)))?;
    let options = MatchOptions {
        case_sensitive: true,
        require_literal_separator: true,
        require_literal_leading_dot: false,
    };

    let read_err = |err| BackupError::ReadDir {
        source: err,
        path: dir.to_path_buf(),
    };

    let mut backups = Vec::new();
    for entry in read_dir(dir).map_err(read_err)? {
        let entry = entry.map_err(read_err)?;
        if entry.file_type().map_err(read_err)?.is_dir() {
            continue;
        }

        if pattern.matches_with(&entry.file_name().to_string_lossy(), options) {
            backups.push(entry.path());
        }
    }
    backups.sort();

    let mut report = CleanupReport::default();
    for backup in backups {
        match remove_file(&backup) {
            Ok(()) => {
                debug!("deleted backup {:?}", backup.display());
                report.deleted.push(backup);
            }
            Err(err) => {
                warn!("failed to delete backup {:?}: {err}", backup.display());
                report.failed.push((backup, err));
            }
        }
    }

    Ok(report)
}

/// Backup error types.
#[derive(Debug, thiserror::Error)]
pub enum BackupError {
    /// File to back up cannot be read.
    #[error("failed to read {:?} for backup", path.display())]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// Backup cannot be written.
    #[error(transparent)]
    Write(#[from] AtomicError),

    /// Directory holding backups cannot be listed.
    #[error("failed to read directory {:?}", path.display())]
    ReadDir {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// Backup file name pattern is invalid.
    #[error(transparent)]
    Pattern(#[from] glob::PatternError),
}

/// Friendly result alias :3
pub type Result<T, E = BackupError> = std::result::Result<T, E>;
