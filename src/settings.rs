// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Settings file I/O.
//!
//! Settings files are plain JSON documents whose root must be an object. They
//! are loaded whole into memory, merged, and written back whole through an
//! atomic rename.

use crate::{
    atomic::{write_atomic, AtomicError},
    merge::Object,
};

use serde_json::Value;
use std::{
    fs::read_to_string,
    path::{Path, PathBuf},
};
use tracing::{debug, instrument};

/// Load settings object from JSON file.
///
/// # Errors
///
/// - Return [`SettingsError::Read`] if file cannot be read.
/// - Return [`SettingsError::Parse`] if file is not valid JSON.
/// - Return [`SettingsError::NotAnObject`] if root of document is not an
///   object.
#[instrument(level = "debug")]
pub fn load_settings(path: &Path) -> Result<Object> {
    let data = read_to_string(path).map_err(|err| SettingsError::Read {
        source: err,
        path: path.to_path_buf(),
    })?;

    let value: Value = serde_json::from_str(&data).map_err(|err| SettingsError::Parse {
        source: err,
        path: path.to_path_buf(),
    })?;

    match value {
        Value::Object(object) => {
            debug!("loaded {} top-level keys from {:?}", object.len(), path.display());
            Ok(object)
        }
        _ => Err(SettingsError::NotAnObject {
            path: path.to_path_buf(),
        }),
    }
}

/// Render settings object as pretty JSON with trailing newline.
///
/// # Errors
///
/// - Return [`SettingsError::Serialize`] if settings cannot be serialized.
pub fn render_settings(settings: &Object) -> Result<String> {
    let mut data = serde_json::to_string_pretty(settings).map_err(SettingsError::Serialize)?;
    data.push('\n');

    Ok(data)
}

/// Write settings object to JSON file atomically.
///
/// Existing permissions of the file being replaced are kept.
///
/// # Errors
///
/// - Return [`SettingsError::Serialize`] if settings cannot be serialized.
/// - Return [`SettingsError::Write`] if atomic write fails.
#[instrument(skip(settings), level = "debug")]
pub fn write_settings(path: &Path, settings: &Object) -> Result<()> {
    let data = render_settings(settings)?;
    let permissions = std::fs::metadata(path).ok().map(|meta| meta.permissions());
    write_atomic(path, data.as_bytes(), permissions)?;

    Ok(())
}

/// Settings file error types.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// Settings file cannot be read.
    #[error("failed to read {:?}", path.display())]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// Settings file is not valid JSON.
    #[error(
        "failed to parse {:?} (note: JSON does not allow // or /* */ comments, remove them)",
        path.display()
    )]
    Parse {
        #[source]
        source: serde_json::Error,
        path: PathBuf,
    },

    /// Settings document root is not an object.
    #[error("settings in {:?} must be a JSON object at the top level", path.display())]
    NotAnObject { path: PathBuf },

    /// Settings cannot be serialized.
    #[error(transparent)]
    Serialize(serde_json::Error),

    /// Settings file cannot be written.
    #[error(transparent)]
    Write(#[from] AtomicError),
}

/// Friendly result alias :3
pub type Result<T, E = SettingsError> = std::result::Result<T, E>;
