// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Configuration layout.
//!
//! Specify the layout of the configuration file that tells us where the master
//! configuration directory lives. Parsing and validation live here, locating
//! the file is left to the caller.
//!
//! # General Layout
//!
//! The configuration file is a small TOML document:
//!
//! ```toml
//! config_dir = "~/dotfiles/claude"
//! ```
//!
//! The master configuration directory mirrors the structure of the user's home
//! directory, i.e., `<config_dir>/.claude/settings.json` is the master copy of
//! `~/.claude/settings.json`.

use serde::{Deserialize, Serialize};
use std::{
    fmt::{Display, Error as FmtError, Formatter, Result as FmtResult},
    fs::read_to_string,
    path::{Path, PathBuf},
    str::FromStr,
};
use tracing::{debug, instrument};

/// Tool configuration.
#[derive(Default, Debug, PartialEq, Eq, Clone, Deserialize, Serialize)]
pub struct ToolConfig {
    /// Path to master configuration directory.
    #[serde(default)]
    pub config_dir: PathBuf,
}

impl ToolConfig {
    /// Load and validate configuration file.
    ///
    /// # Errors
    ///
    /// - Return [`ConfigError::Read`] if configuration file cannot be read.
    /// - Return [`ConfigError::MissingConfigDir`] if `config_dir` is empty.
    /// - Return [`ConfigError::ConfigDirNotFound`] if `config_dir` does not
    ///   exist.
    /// - Return [`ConfigError::Deserialize`] or [`ConfigError::ShellExpansion`]
    ///   if parsing fails.
    #[instrument(level = "debug")]
    pub fn load(path: &Path) -> Result<Self> {
        let data = read_to_string(path).map_err(|err| ConfigError::Read {
            source: err,
            path: path.to_path_buf(),
        })?;
        let config: ToolConfig = data.parse()?;

        if config.config_dir.as_os_str().is_empty() {
            return Err(ConfigError::MissingConfigDir {
                path: path.to_path_buf(),
            });
        }

        match std::fs::metadata(&config.config_dir) {
            Ok(_) => {}
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(ConfigError::ConfigDirNotFound {
                    config_dir: config.config_dir,
                    path: path.to_path_buf(),
                });
            }
            Err(err) => {
                return Err(ConfigError::Read {
                    source: err,
                    path: config.config_dir,
                });
            }
        }

        debug!("master config directory is {:?}", config.config_dir.display());
        Ok(config)
    }
}

impl FromStr for ToolConfig {
    type Err = ConfigError;

    fn from_str(data: &str) -> Result<Self, Self::Err> {
        let mut config: ToolConfig = toml::de::from_str(data).map_err(ConfigError::Deserialize)?;

        // INVARIANT: Perform shell expansion on master config directory.
        let expanded = shellexpand::full(&config.config_dir.to_string_lossy())
            .map_err(ConfigError::ShellExpansion)?
            .into_owned();
        config.config_dir = expanded.into();

        Ok(config)
    }
}

impl Display for ToolConfig {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        fmt.write_str(
            toml::ser::to_string_pretty(self)
                .map_err(ConfigError::Serialize)?
                .as_str(),
        )
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read configuration.
    #[error("failed to read {:?}", path.display())]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// Configuration lacks master config directory.
    #[error("config_dir is required in {:?}", path.display())]
    MissingConfigDir { path: PathBuf },

    /// Master config directory does not exist.
    #[error("config_dir {:?} does not exist (check {:?})", config_dir.display(), path.display())]
    ConfigDirNotFound { config_dir: PathBuf, path: PathBuf },

    /// Failed to deserialize configuration.
    #[error(transparent)]
    Deserialize(#[from] toml::de::Error),

    /// Failed to serialize configuration.
    #[error(transparent)]
    Serialize(#[from] toml::ser::Error),

    /// Failed to perform shell expansion on configuration.
    #[error(transparent)]
    ShellExpansion(#[from] shellexpand::LookupError<std::env::VarError>),
}

impl From<ConfigError> for FmtError {
    fn from(_: ConfigError) -> Self {
        FmtError
    }
}

/// Friendly result alias :3
pub type Result<T, E = ConfigError> = std::result::Result<T, E>;
