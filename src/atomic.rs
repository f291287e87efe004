// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Crash-safe file replacement.
//!
//! Files are never written in place. Content goes into a temporary file that
//! lives in the same directory as the destination, and only once that file is
//! completely written and flushed to disk is it renamed over the destination.
//! Rename within one file system is atomic, so readers observe either the old
//! file or the new file, never a partial one. A crash mid-write leaves the
//! original untouched, plus at worst a stray hidden temporary file.

use std::{
    fs::{File, Permissions},
    io::{Read, Write},
    path::{Path, PathBuf},
};
use tempfile::{Builder, NamedTempFile};
use tracing::{debug, instrument};

/// Write bytes to target path atomically.
///
/// If `permissions` is given, the temporary file receives them before being
/// renamed into place. Otherwise the temporary file's defaults apply.
///
/// # Errors
///
/// - Return [`AtomicError::CreateTemp`] if temporary file cannot be created.
/// - Return [`AtomicError::WriteTemp`] if content cannot be written or synced.
/// - Return [`AtomicError::Permissions`] if permissions cannot be applied.
/// - Return [`AtomicError::Persist`] if final rename fails.
#[instrument(skip(contents, permissions), level = "debug")]
pub fn write_atomic(path: &Path, contents: &[u8], permissions: Option<Permissions>) -> Result<()> {
    let mut tmp = temp_file_for(path)?;

    tmp.write_all(contents)
        .and_then(|_| tmp.as_file().sync_all())
        .map_err(|err| AtomicError::WriteTemp {
            source: err,
            path: path.to_path_buf(),
        })?;

    if let Some(permissions) = permissions {
        tmp.as_file()
            .set_permissions(permissions)
            .map_err(|err| AtomicError::Permissions {
                source: err,
                path: path.to_path_buf(),
            })?;
    }

    persist(tmp, path)
}

/// Copy regular file atomically.
///
/// Copies the full byte content and permission mode of `src` over `dst`.
///
/// # Errors
///
/// - Return [`AtomicError::ReadSource`] if source cannot be opened or read.
/// - Return [`AtomicError::CreateTemp`] if temporary file cannot be created.
/// - Return [`AtomicError::WriteTemp`] if content cannot be written or synced.
/// - Return [`AtomicError::Permissions`] if permissions cannot be applied.
/// - Return [`AtomicError::Persist`] if final rename fails.
#[instrument(level = "debug")]
pub fn copy_file_atomic(src: &Path, dst: &Path) -> Result<()> {
    let read_err = |err| AtomicError::ReadSource {
        source: err,
        path: src.to_path_buf(),
    };

    let mut input = File::open(src).map_err(read_err)?;
    let permissions = input.metadata().map_err(read_err)?.permissions();
    let mut tmp = temp_file_for(dst)?;

    // INVARIANT: Permissions go on before any content lands in the temporary file.
    tmp.as_file()
        .set_permissions(permissions)
        .map_err(|err| AtomicError::Permissions {
            source: err,
            path: dst.to_path_buf(),
        })?;

    let mut buffer = Vec::new();
    input.read_to_end(&mut buffer).map_err(read_err)?;
    tmp.write_all(&buffer)
        .and_then(|_| tmp.as_file().sync_all())
        .map_err(|err| AtomicError::WriteTemp {
            source: err,
            path: dst.to_path_buf(),
        })?;

    persist(tmp, dst)
}

fn temp_file_for(path: &Path) -> Result<NamedTempFile> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    Builder::new()
        .prefix(".ccm-")
        .tempfile_in(dir)
        .map_err(|err| AtomicError::CreateTemp {
            source: err,
            path: path.to_path_buf(),
        })
}

fn persist(tmp: NamedTempFile, path: &Path) -> Result<()> {
    // INVARIANT: Temporary file is deleted on drop if persisting fails.
    tmp.persist(path).map_err(|err| AtomicError::Persist {
        source: err.error,
        path: path.to_path_buf(),
    })?;
    debug!("atomically replaced {:?}", path.display());

    Ok(())
}

/// Atomic write error types.
#[derive(Debug, thiserror::Error)]
pub enum AtomicError {
    /// Source file cannot be read.
    #[error("failed to read {:?}", path.display())]
    ReadSource {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// Temporary file cannot be created next to destination.
    #[error("failed to create temporary file for {:?}", path.display())]
    CreateTemp {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// Temporary file cannot be written or synced.
    #[error("failed to write temporary file for {:?}", path.display())]
    WriteTemp {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// Permissions cannot be applied to temporary file.
    #[error("failed to set permissions on temporary file for {:?}", path.display())]
    Permissions {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// Temporary file cannot be renamed over destination.
    #[error("failed to rename temporary file to {:?}", path.display())]
    Persist {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
}

/// Friendly result alias :3
pub type Result<T, E = AtomicError> = std::result::Result<T, E>;
