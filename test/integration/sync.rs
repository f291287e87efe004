// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

use crate::{capture, ClaudeFixture};

use anyhow::Result;
use claude_config_merge::{command::CommandError, SyncReport};
use indoc::indoc;
use pretty_assertions::assert_eq;
use std::fs;

#[test]
fn agents_copies_and_reports() -> Result<()> {
    let fixture = ClaudeFixture::new()?;
    fixture.write_master("agents/reviewer.md", "review")?;
    fixture.write_master("agents/planner.md", "plan")?;

    let (result, output) = capture(|out| fixture.workspace().agents(false, out));
    let report = result?.expect("destination is not a symlink");
    assert_eq!(report.copied, vec!["planner.md", "reviewer.md"]);
    assert_eq!(fs::read_to_string(fixture.local("agents/reviewer.md"))?, "review");

    let expect = indoc! {"
        Agents: copied 2, skipped 0, forced 0
          Copied:
            planner.md
            reviewer.md
    "};
    assert_eq!(output, expect);

    Ok(())
}

#[test]
fn skills_skip_then_force() -> Result<()> {
    let fixture = ClaudeFixture::new()?;
    fixture.write_master("skills/a.md", "new")?;
    fixture.write_local("skills/a.md", "old")?;

    let (result, output) = capture(|out| fixture.workspace().skills(false, out));
    assert_eq!(
        result?,
        Some(SyncReport {
            skipped: vec!["a.md".into()],
            ..Default::default()
        })
    );
    assert_eq!(fs::read_to_string(fixture.local("skills/a.md"))?, "old");
    assert!(output.contains("Skipped (use -f to overwrite):\n    a.md\n"));

    let (result, output) = capture(|out| fixture.workspace().skills(true, out));
    assert_eq!(
        result?,
        Some(SyncReport {
            forced: vec!["a.md".into()],
            ..Default::default()
        })
    );
    assert_eq!(fs::read_to_string(fixture.local("skills/a.md"))?, "new");
    assert!(output.contains("Skills: copied 0, skipped 0, forced 1"));

    Ok(())
}

#[cfg(unix)]
#[test]
fn symlinked_destination_is_left_alone() -> Result<()> {
    let fixture = ClaudeFixture::new()?;
    fixture.write_master("agents/a.md", "new")?;
    let elsewhere = fixture.home_root().join("elsewhere");
    fs::create_dir_all(&elsewhere)?;
    std::os::unix::fs::symlink(&elsewhere, fixture.local("agents"))?;

    let (result, output) = capture(|out| fixture.workspace().agents(true, out));
    assert_eq!(result?, None);
    assert!(!elsewhere.join("a.md").exists());
    assert!(output.contains("is a symbolic link, skipping."));
    assert!(output.contains("remove it first: rm "));

    Ok(())
}

#[test]
fn all_runs_every_step() -> Result<()> {
    let fixture = ClaudeFixture::new()?;
    fixture.write_master("settings.json", r#"{"model": "opus"}"#)?;
    fixture.write_local("settings.json", "{}")?;
    fixture.write_master("agents/a.md", "agent")?;
    fixture.write_master("skills/s/SKILL.md", "skill")?;

    let (result, output) = capture(|out| fixture.workspace().all(false, out));
    result?;

    assert!(fs::read_to_string(fixture.local("settings.json"))?.contains("\"model\": \"opus\""));
    assert_eq!(fs::read_to_string(fixture.local("agents/a.md"))?, "agent");
    assert_eq!(fs::read_to_string(fixture.local("skills/s/SKILL.md"))?, "skill");
    assert!(output.contains("Agents: copied 1, skipped 0, forced 0"));
    assert!(output.contains("Skills: copied 1, skipped 0, forced 0"));

    Ok(())
}

#[test]
fn all_without_aux_trees_reports_missing_sources() -> Result<()> {
    let fixture = ClaudeFixture::new()?;
    fixture.write_master("settings.json", "{}")?;
    fixture.write_local("settings.json", "{}")?;

    let (result, output) = capture(|out| fixture.workspace().all(false, out));
    result?;

    assert!(output.contains("Agents: source directory not found, skipping"));
    assert!(output.contains("Skills: source directory not found, skipping"));
    assert!(!fixture.local("agents").exists());

    Ok(())
}

#[test]
fn all_stops_at_settings_failure() -> Result<()> {
    let fixture = ClaudeFixture::new()?;
    fixture.write_local("settings.json", "{}")?;
    fixture.write_master("agents/a.md", "agent")?;

    let (result, _) = capture(|out| fixture.workspace().all(false, out));
    assert!(matches!(result, Err(CommandError::LoadMaster(_))));
    assert!(!fixture.local("agents/a.md").exists());

    Ok(())
}

#[test]
fn skills_force_aborts_on_blocked_subtree() -> Result<()> {
    let fixture = ClaudeFixture::new()?;
    fixture.write_master("skills/a.md", "ay")?;
    fixture.write_master("skills/zdir/SKILL.md", "skill")?;
    fixture.write_local("skills/zdir", "i am a file")?;

    let (result, _) = capture(|out| fixture.workspace().skills(true, out));
    assert!(matches!(result, Err(CommandError::Sync { .. })));
    assert_eq!(fs::read_to_string(fixture.local("skills/a.md"))?, "ay");
    assert_eq!(fs::read_to_string(fixture.local("skills/zdir"))?, "i am a file");

    Ok(())
}
