// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Directory synchronization.
//!
//! Copies the entries of a source directory into a destination directory. Each
//! top-level entry is either a regular file or a directory subtree. Entries
//! that already exist at the destination are skipped, unless force mode is
//! active, in which case they are overwritten.
//!
//! Only regular files and directories are copied. Symbolic links, sockets,
//! devices, and the like are silently ignored at every depth. Every file lands
//! at its destination through an atomic rename, so a partially written file is
//! never visible under its final name.
//!
//! Entries are visited in name order. A failure while copying one entry aborts
//! the whole sync, and entries copied before the failure stay in place.

use crate::atomic::{copy_file_atomic, AtomicError};

use std::{
    fs::{metadata, read_dir, set_permissions, symlink_metadata, DirEntry, FileType},
    io::{Error as IoError, ErrorKind},
    path::{Path, PathBuf},
};
use tracing::{debug, instrument};

/// Outcome of a directory sync.
///
/// Lists top-level entry names only, sorted. Nested names are never listed.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SyncReport {
    /// Entries that did not exist at destination.
    pub copied: Vec<String>,

    /// Entries that existed at destination and were left alone.
    pub skipped: Vec<String>,

    /// Entries that existed at destination and were overwritten.
    pub forced: Vec<String>,
}

impl SyncReport {
    /// Total number of entries listed.
    pub fn total(&self) -> usize {
        self.copied.len() + self.skipped.len() + self.forced.len()
    }

    /// Check if no entry was listed at all.
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// Sync entries of source directory into destination directory.
///
/// A missing source directory is a valid empty state, and yields an empty
/// report. The destination directory is created along with any missing
/// parents.
///
/// Existence at the destination is checked without following symbolic links,
/// so a broken or looping link still counts as an existing entry.
///
/// # Errors
///
/// - Return [`SyncError::ReadDir`] if source directory cannot be listed.
/// - Return [`SyncError::CreateDir`] if destination directory cannot be made,
///   or a non-directory already sits in its place.
/// - Return [`SyncError::Stat`] if destination entry cannot be inspected.
/// - Return [`SyncError::Permissions`] if directory mode cannot be copied.
/// - Return [`SyncError::Copy`] if a file fails to copy.
#[instrument(skip(source, dest), level = "debug")]
pub fn sync_dir(source: impl AsRef<Path>, dest: impl AsRef<Path>, force: bool) -> Result<SyncReport> {
    let source = source.as_ref();
    let dest = dest.as_ref();
    let mut report = SyncReport::default();

    let entries = match read_dir(source) {
        Ok(entries) => entries,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            debug!("source {:?} does not exist, nothing to sync", source.display());
            return Ok(report);
        }
        Err(err) => return Err(SyncError::ReadDir { source: err, path: source.to_path_buf() }),
    };

    create_dir_all(dest)?;

    let mut entries = entries
        .collect::<std::io::Result<Vec<_>>>()
        .map_err(|err| SyncError::ReadDir {
            source: err,
            path: source.to_path_buf(),
        })?;
    entries.sort_by_key(DirEntry::file_name);

    for entry in entries {
        let name = entry.file_name().to_string_lossy().into_owned();
        let dest_path = dest.join(entry.file_name());

        let exists = match symlink_metadata(&dest_path) {
            Ok(_) => true,
            Err(err) if err.kind() == ErrorKind::NotFound => false,
            Err(err) => return Err(SyncError::Stat { source: err, path: dest_path }),
        };

        if exists && !force {
            debug!("skip existing entry {name:?}");
            report.skipped.push(name);
            continue;
        }

        let file_type = entry_file_type(&entry)?;
        if file_type.is_file() {
            copy_file_atomic(&entry.path(), &dest_path)?;
        } else if file_type.is_dir() {
            copy_tree(&entry.path(), &dest_path)?;
        } else {
            debug!("ignore special entry {name:?}");
            continue;
        }

        if exists {
            debug!("overwrite {:?}", dest_path.display());
            report.forced.push(name);
        } else {
            debug!("copy {:?}", dest_path.display());
            report.copied.push(name);
        }
    }

    report.copied.sort();
    report.skipped.sort();
    report.forced.sort();

    Ok(report)
}

/// Recursively copy directory tree, skipping anything not a file or directory.
///
/// Directory modes are applied after their contents are copied, so a read-only
/// source directory does not lock us out of its own copy.
fn copy_tree(source: &Path, dest: &Path) -> Result<()> {
    create_dir_all(dest)?;

    let entries = read_dir(source).map_err(|err| SyncError::ReadDir {
        source: err,
        path: source.to_path_buf(),
    })?;

    for entry in entries {
        let entry = entry.map_err(|err| SyncError::ReadDir {
            source: err,
            path: source.to_path_buf(),
        })?;
        let dest_path = dest.join(entry.file_name());
        let file_type = entry_file_type(&entry)?;

        if file_type.is_dir() {
            copy_tree(&entry.path(), &dest_path)?;
        } else if file_type.is_file() {
            copy_file_atomic(&entry.path(), &dest_path)?;
        }
    }

    let permissions = metadata(source)
        .map_err(|err| SyncError::Stat {
            source: err,
            path: source.to_path_buf(),
        })?
        .permissions();
    set_permissions(dest, permissions).map_err(|err| SyncError::Permissions {
        source: err,
        path: dest.to_path_buf(),
    })
}

fn create_dir_all(path: &Path) -> Result<()> {
    mkdirp::mkdirp(path).map_err(|err| SyncError::CreateDir {
        source: err,
        path: path.to_path_buf(),
    })?;

    // INVARIANT: Existing non-directory at path is never a usable destination.
    if !path.is_dir() {
        return Err(SyncError::CreateDir {
            source: IoError::new(ErrorKind::AlreadyExists, "path exists and is not a directory"),
            path: path.to_path_buf(),
        });
    }

    Ok(())
}

// INVARIANT: Never follow symbolic links when classifying an entry.
fn entry_file_type(entry: &DirEntry) -> Result<FileType> {
    entry.file_type().map_err(|err| SyncError::Stat {
        source: err,
        path: entry.path(),
    })
}

/// Directory sync error types.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// Directory cannot be listed.
    #[error("failed to read directory {:?}", path.display())]
    ReadDir {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// Directory cannot be created.
    #[error("failed to create directory {:?}", path.display())]
    CreateDir {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// Directory mode cannot be applied to its copy.
    #[error("failed to set permissions on {:?}", path.display())]
    Permissions {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// Entry metadata cannot be read.
    #[error("failed to inspect {:?}", path.display())]
    Stat {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// File cannot be copied.
    #[error(transparent)]
    Copy(#[from] AtomicError),
}

/// Friendly result alias :3
pub type Result<T, E = SyncError> = std::result::Result<T, E>;
