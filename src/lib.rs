// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Synchronize a user's Claude configuration with a master configuration
//! directory.
//!
//! Two things get synchronized:
//!
//! 1. __Settings__: the master `settings.json` is deep merged into the local
//!    `settings.json`, preferring local values unless forced. See [`merge`].
//! 2. __Auxiliary trees__: the master `agents/` and `skills/` directories are
//!    copied into their local counterparts, skipping entries that already
//!    exist unless forced. See [`sync`].
//!
//! Local files are only ever replaced through an atomic rename, and the local
//! settings file is backed up before being replaced.

pub mod atomic;
pub mod backup;
pub mod command;
pub mod config;
pub mod merge;
pub mod path;
pub mod report;
pub mod settings;
pub mod sync;

pub use command::Workspace;
pub use config::ToolConfig;
pub use merge::{merge, Conflict, MergeReport};
pub use sync::{sync_dir, SyncReport};
