// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

use claude_config_merge::{
    path::{default_config_path, home_dir},
    ToolConfig, Workspace,
};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::{
    io::stdout,
    path::{Path, PathBuf},
    process::exit,
};
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Sync Claude configuration from a master config directory.
///
/// The master config directory mirrors the structure of the home directory:
/// `<config_dir>/.claude/settings.json` is merged into
/// `~/.claude/settings.json`, while `<config_dir>/.claude/agents/` and
/// `<config_dir>/.claude/skills/` are copied into `~/.claude/agents/` and
/// `~/.claude/skills/`.
#[derive(Debug, Clone, Parser)]
#[command(
    about,
    long_about,
    override_usage = "claude-config-merge [options] <command> [-f]",
    subcommand_help_heading = "Commands",
    version
)]
struct Cli {
    /// Path to config file [default: ~/.claude-config-merge.toml].
    #[arg(long, global = true, value_name = "file")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    fn run(self) -> Result<()> {
        let config_path = match self.config {
            Some(path) => path,
            None => default_config_path()
                .context("use --config to specify a config file path")?,
        };
        let config = ToolConfig::load(&config_path).with_context(|| config_hint(&config_path))?;
        let workspace = Workspace::new(&config.config_dir, home_dir()?);
        let mut out = stdout().lock();

        match self.command {
            Command::Settings(opts) => {
                workspace.settings(opts.force, &mut out)?;
            }
            Command::Agents(opts) => {
                workspace.agents(opts.force, &mut out)?;
            }
            Command::Skills(opts) => {
                workspace.skills(opts.force, &mut out)?;
            }
            Command::All(opts) => workspace.all(opts.force, &mut out)?,
            Command::CleanupBak => {
                workspace.cleanup_bak(&mut out)?;
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Merge master settings.json into ~/.claude/settings.json.
    ///
    /// New keys from master are added, existing local keys are kept. Use -f to
    /// let master values overwrite conflicting local keys.
    #[command(override_usage = "claude-config-merge settings [-f]")]
    Settings(ForceOptions),

    /// Copy agent files from master into ~/.claude/agents.
    ///
    /// Existing entries are skipped unless -f is given.
    #[command(override_usage = "claude-config-merge agents [-f]")]
    Agents(ForceOptions),

    /// Copy skill files from master into ~/.claude/skills.
    ///
    /// Existing entries are skipped unless -f is given.
    #[command(override_usage = "claude-config-merge skills [-f]")]
    Skills(ForceOptions),

    /// Run settings, agents, and skills in sequence.
    #[command(override_usage = "claude-config-merge all [-f]")]
    All(ForceOptions),

    /// Delete settings.json.*.bak backup files from ~/.claude.
    #[command(name = "cleanup-bak", override_usage = "claude-config-merge cleanup-bak")]
    CleanupBak,
}

#[derive(Args, Clone, Debug)]
struct ForceOptions {
    /// Force overwrite of conflicting keys or existing entries.
    #[arg(short, long)]
    pub force: bool,
}

/// Explain how to create a missing or broken configuration file.
fn config_hint(path: &Path) -> String {
    let template = ToolConfig {
        config_dir: "/path/to/your/claude/configs".into(),
    };
    let mut hint = format!("create {:?} with contents:\n", path.display());
    for line in template.to_string().lines() {
        hint.push_str("  ");
        hint.push_str(line);
        hint.push('\n');
    }
    hint.trim_end().to_string()
}

fn main() {
    let layer = fmt::layer()
        .compact()
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr);
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap();
    tracing_subscriber::registry()
        .with(layer)
        .with(filter)
        .init();

    if let Err(error) = run() {
        error!("{error:?}");
        exit(1);
    }

    exit(0)
}

fn run() -> Result<()> {
    Cli::parse().run()
}
