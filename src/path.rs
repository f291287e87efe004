// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Path resolution utilities.
//!
//! Determine relevent path information for external files that need to be
//! interacted with, or managed in some way.

use std::path::{Path, PathBuf};

/// Name of settings file inside a Claude directory.
pub const SETTINGS_FILE_NAME: &str = "settings.json";

/// Determine absolute path to user's home directory.
///
/// Does not check if the path returned actually exists.
///
/// # Errors
///
/// - Return [`NoWayHome`] if home directory path cannot be determined.
pub fn home_dir() -> Result<PathBuf> {
    dirs::home_dir().ok_or(NoWayHome)
}

/// Determine default absolute path to tool configuration file.
///
/// Uses `$HOME/.claude-config-merge.toml` as the default. Does not check if
/// the path returned actually exists.
///
/// # Errors
///
/// - Return [`NoWayHome`] if home directory path cannot be determined.
pub fn default_config_path() -> Result<PathBuf> {
    home_dir().map(|path| path.join(".claude-config-merge.toml"))
}

/// Layout of a Claude directory under some root.
///
/// Both the user's home directory and the master configuration directory
/// share this layout, so the same type locates local and master data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaudeLayout {
    claude_dir: PathBuf,
}

impl ClaudeLayout {
    /// Construct new layout rooted at target directory.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            claude_dir: root.as_ref().join(".claude"),
        }
    }

    /// Path to `.claude` directory itself.
    pub fn claude_dir(&self) -> &Path {
        self.claude_dir.as_path()
    }

    /// Path to `settings.json`.
    pub fn settings(&self) -> PathBuf {
        self.claude_dir.join(SETTINGS_FILE_NAME)
    }

    /// Path to `agents` directory.
    pub fn agents(&self) -> PathBuf {
        self.claude_dir.join("agents")
    }

    /// Path to `skills` directory.
    pub fn skills(&self) -> PathBuf {
        self.claude_dir.join("skills")
    }
}

/// No way to determine user's home directory.
///
/// # See Also
///
/// - [`dirs::home_dir`](https://docs.rs/dirs/latest/dirs/fn.home_dir.html)
#[derive(Clone, Debug, thiserror::Error)]
#[error("cannot determine absolute path to user's home directory")]
pub struct NoWayHome;

/// Friendly result alias :3
pub type Result<T, E = NoWayHome> = std::result::Result<T, E>;
