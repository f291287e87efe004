// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

use crate::{capture, ClaudeFixture};

use anyhow::Result;
use claude_config_merge::{command::CommandError, settings::load_settings};
use indoc::indoc;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::fs;

#[test]
fn settings_merges_new_keys_and_backs_up() -> Result<()> {
    let fixture = ClaudeFixture::new()?;
    fixture.write_master("settings.json", r#"{"model": "opus", "env": {"A": "1"}}"#)?;
    fixture.write_local("settings.json", r#"{"theme": "dark", "env": {"B": "2"}}"#)?;
    let original = fs::read_to_string(fixture.local("settings.json"))?;

    let (result, output) = capture(|out| fixture.workspace().settings(false, out));
    let report = result?;
    assert_eq!(report.added, vec!["env.A", "model"]);
    assert_eq!(report.local_only, vec!["env.B", "theme"]);

    let merged = load_settings(&fixture.local("settings.json"))?;
    assert_eq!(
        Value::Object(merged),
        json!({"model": "opus", "theme": "dark", "env": {"A": "1", "B": "2"}})
    );

    let backups = fixture.local_backups()?;
    assert_eq!(backups.len(), 1);
    assert_eq!(fs::read_to_string(fixture.local(&backups[0]))?, original);

    assert!(output.contains("Backup created: "));
    assert!(output.contains(indoc! {"
        Keys added:
          env.A
          model
    "}));
    assert!(output.contains(
        "Done. Keys added: 2  |  Forced: 0  |  Conflicts: 0  |  Matching: 0  |  Local-only: 2"
    ));

    Ok(())
}

#[test]
fn settings_written_file_is_pretty_with_trailing_newline() -> Result<()> {
    let fixture = ClaudeFixture::new()?;
    fixture.write_master("settings.json", r#"{"b": [1, 2]}"#)?;
    fixture.write_local("settings.json", r#"{"a": true}"#)?;

    let (result, _) = capture(|out| fixture.workspace().settings(false, out));
    result?;

    let expect = indoc! {r#"
        {
          "a": true,
          "b": [
            1,
            2
          ]
        }
    "#};
    assert_eq!(fs::read_to_string(fixture.local("settings.json"))?, expect);

    Ok(())
}

#[test]
fn settings_without_changes_writes_nothing() -> Result<()> {
    let fixture = ClaudeFixture::new()?;
    fixture.write_master("settings.json", r#"{"model": "opus", "theme": "light"}"#)?;
    fixture.write_local("settings.json", r#"{"model":"opus","theme":"dark"}"#)?;

    let (result, output) = capture(|out| fixture.workspace().settings(false, out));
    let report = result?;
    assert_eq!(report.matching, vec!["model"]);
    assert_eq!(report.conflicts.len(), 1);

    assert_eq!(
        fs::read_to_string(fixture.local("settings.json"))?,
        r#"{"model":"opus","theme":"dark"}"#
    );
    assert!(fixture.local_backups()?.is_empty());
    assert!(output.contains("  theme\n    master: \"light\"\n    local:  \"dark\"\n"));
    assert!(output.contains(
        "No changes to write. Keys added: 0  |  Conflicts: 1  |  Matching: 1  |  Local-only: 0"
    ));

    Ok(())
}

#[test]
fn settings_force_applies_master_on_conflict() -> Result<()> {
    let fixture = ClaudeFixture::new()?;
    fixture.write_master("settings.json", r#"{"theme": "light", "perms": {"allow": ["a"]}}"#)?;
    fixture.write_local("settings.json", r#"{"theme": "dark", "perms": {"allow": ["b"]}}"#)?;

    let (result, output) = capture(|out| fixture.workspace().settings(true, out));
    let report = result?;
    assert_eq!(report.forced, vec!["perms.allow", "theme"]);
    assert!(report.conflicts.is_empty());

    let merged = load_settings(&fixture.local("settings.json"))?;
    assert_eq!(
        Value::Object(merged),
        json!({"theme": "light", "perms": {"allow": ["a"]}})
    );
    assert_eq!(fixture.local_backups()?.len(), 1);
    assert!(output.contains("Forced overwrites (master value applied):"));
    assert!(!output.contains("Keys added:\n"));
    assert!(output.contains("Done. Keys added: 0  |  Forced: 2  |"));

    Ok(())
}

#[test]
fn settings_reports_nested_conflict_values() -> Result<()> {
    let fixture = ClaudeFixture::new()?;
    fixture.write_master("settings.json", r#"{"hooks": {"pre": ["lint"]}}"#)?;
    fixture.write_local("settings.json", r#"{"hooks": "off"}"#)?;

    let (result, output) = capture(|out| fixture.workspace().settings(false, out));
    result?;

    let expect = concat!(
        "  hooks\n",
        "    master: {\n",
        "      \"pre\": [\n",
        "        \"lint\"\n",
        "      ]\n",
        "    }\n",
        "    local:  \"off\"\n",
    );
    assert!(output.contains(expect));

    Ok(())
}

#[test]
fn settings_invalid_local_json_is_parse_error() -> Result<()> {
    let fixture = ClaudeFixture::new()?;
    fixture.write_master("settings.json", "{}")?;
    fixture.write_local("settings.json", "{ // nope\n}")?;

    let (result, _) = capture(|out| fixture.workspace().settings(false, out));
    assert!(matches!(result, Err(CommandError::LoadLocal(_))));

    Ok(())
}
