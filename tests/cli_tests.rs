use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn jumplink() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_jumplink"));
    cmd.env_remove("RUST_LOG");
    cmd
}

fn write_note(dir: &Path, content: &str) -> String {
    let path = dir.join("note.md");
    fs::write(&path, content).unwrap();
    path.to_str().unwrap().to_string()
}

#[test]
fn test_hints_text_output() {
    let dir = tempdir().unwrap();
    let note = write_note(dir.path(), "See [[Alpha]] and [[Beta|Bee]]");

    jumplink()
        .args(["--no-config", "--color", "never", "hints", &note])
        .assert()
        .success()
        .stdout(predicate::str::contains("Alpha"))
        .stdout(predicate::str::contains("Beta"))
        .stdout(predicate::str::contains("Bee").not());
}

#[test]
fn test_hints_json_output() {
    let dir = tempdir().unwrap();
    let note = write_note(dir.path(), "Visit https://example.com now");

    let output = jumplink()
        .args(["--no-config", "hints", &note, "--output", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let hints: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(hints[0]["label"], "S");
    assert_eq!(hints[0]["kind"], "external");
    assert_eq!(hints[0]["payload"], "https://example.com");
    assert_eq!(hints[0]["position"], 6);
}

#[test]
fn test_hints_from_stdin() {
    jumplink()
        .args(["--no-config", "--color", "never", "hints", "-"])
        .write_stdin("[doc](../guide.md)\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("../guide.md"));
}

#[test]
fn test_no_targets_exits_one() {
    let dir = tempdir().unwrap();
    let note = write_note(dir.path(), "nothing to see here [x]()");

    jumplink()
        .args(["--no-config", "hints", &note])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No targets"));
}

#[test]
fn test_jump_selects_by_label() {
    let dir = tempdir().unwrap();
    let note = write_note(dir.path(), "[[One]] [[Two%20Words]]");

    jumplink()
        .args(["--no-config", "--color", "never", "jump", &note, "--keys", "a"])
        .assert()
        .success()
        .stdout(predicate::str::contains("open Two Words"));
}

#[test]
fn test_jump_shift_opens_new_pane_json() {
    let dir = tempdir().unwrap();
    let note = write_note(dir.path(), "[[One]] [[Two]]");

    let output = jumplink()
        .args(["--no-config", "jump", &note, "--keys", "S", "--output", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let action: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(action["action"], "open-internal");
    assert_eq!(action["target"], "One");
    assert_eq!(action["new_pane"], true);
}

#[test]
fn test_jump_single_target_jumps_without_keys() {
    let dir = tempdir().unwrap();
    let note = write_note(dir.path(), "only https://x.io here");

    jumplink()
        .args(["--no-config", "--color", "never", "jump", &note, "--keys", ""])
        .assert()
        .success()
        .stdout(predicate::str::contains("open-url https://x.io"));
}

#[test]
fn test_jump_unknown_key_cancels() {
    let dir = tempdir().unwrap();
    let note = write_note(dir.path(), "[[One]] [[Two]]");

    jumplink()
        .args(["--no-config", "jump", &note, "--keys", "z"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Cancelled"));
}

#[test]
fn test_jump_regex_extends_selection() {
    let dir = tempdir().unwrap();
    let note = write_note(dir.path(), "foo bar foo");

    jumplink()
        .args([
            "--no-config",
            "--color",
            "never",
            "jump",
            &note,
            "--mode",
            "regex",
            "--pattern",
            "foo",
            "--keys",
            "a",
            "--anchor",
            "4",
            "--vim-mode",
            "visual",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("select 4..8"));
}

#[test]
fn test_lightspeed_mode() {
    let dir = tempdir().unwrap();
    let note = write_note(dir.path(), "the other thing");

    let output = jumplink()
        .args([
            "--no-config",
            "hints",
            &note,
            "--mode",
            "lightspeed",
            "--chars",
            "th",
            "--output",
            "json",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());
    let hints: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let positions: Vec<u64> = hints
        .as_array()
        .unwrap()
        .iter()
        .map(|h| h["position"].as_u64().unwrap())
        .collect();
    assert_eq!(positions, vec![0, 10]);
}

#[test]
fn test_invalid_pattern_is_tool_error() {
    let dir = tempdir().unwrap();
    let note = write_note(dir.path(), "text");

    jumplink()
        .args(["--no-config", "hints", &note, "--mode", "regex", "--pattern", "(open"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid hint pattern"));
}

#[test]
fn test_lines_window_keeps_document_positions() {
    let dir = tempdir().unwrap();
    let note = write_note(dir.path(), "[[Zero]]\n[[One]]\n[[Two]]\n");

    let output = jumplink()
        .args(["--no-config", "hints", &note, "--lines", "2:2", "--output", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let hints: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(hints.as_array().unwrap().len(), 1);
    assert_eq!(hints[0]["payload"], "One");
    assert_eq!(hints[0]["position"], 9);
}

#[test]
fn test_preview_mode_sorts_by_layout() {
    let dir = tempdir().unwrap();
    let links = dir.path().join("links.json");
    fs::write(
        &links,
        r#"[
            {"top": 40, "left": 0, "kind": "internal", "payload": "Later"},
            {"top": 10, "left": 5, "kind": "external", "payload": "https://first.io"}
        ]"#,
    )
    .unwrap();

    let output = jumplink()
        .args(["--no-config", "hints", links.to_str().unwrap(), "--mode", "preview", "--output", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let hints: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(hints[0]["payload"], "https://first.io");
    assert_eq!(hints[0]["source"], "rendered");
    assert_eq!(hints[1]["payload"], "Later");
}

#[test]
fn test_config_file_letters_are_used() {
    let dir = tempdir().unwrap();
    let note = write_note(dir.path(), "[[One]] [[Two]]");
    let config = dir.path().join("custom.toml");
    fs::write(&config, "[global]\nletters = \"qw\"\n").unwrap();

    let output = jumplink()
        .args(["--config", config.to_str().unwrap(), "hints", &note, "--output", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let hints: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(hints[0]["label"], "Q");
    assert_eq!(hints[1]["label"], "W");
}

#[test]
fn test_invalid_config_pattern_is_tool_error() {
    let dir = tempdir().unwrap();
    let note = write_note(dir.path(), "[[One]]");
    let config = dir.path().join("custom.toml");
    fs::write(&config, "[jump-to-anywhere]\nregex = '(oops'\n").unwrap();

    jumplink()
        .args(["--config", config.to_str().unwrap(), "hints", &note])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Config error"));
}

#[test]
fn test_init_writes_default_config_once() {
    let dir = tempdir().unwrap();

    jumplink()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains(".jumplink.toml"));
    assert!(dir.path().join(".jumplink.toml").exists());

    jumplink()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_config_defaults_and_schema() {
    jumplink()
        .args(["config", "--defaults"])
        .assert()
        .success()
        .stdout(predicate::str::contains("letters = \"sadfjklewcmpgh\""));

    jumplink()
        .arg("schema")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"jump-to-anywhere\""));
}
