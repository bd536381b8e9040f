//! Integration tests for CLI output behavior
//!
//! The default behavior is quiet (no logs). Use -v/--verbose to enable logs.
//! Every run gets its own data directory and home so nothing touches the
//! real preferences or helpers.

use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

fn windock(home: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_windock"))
        .args(args)
        .env("HOME", home)
        .env("WINDOCK_DATA_DIR", home.join("data"))
        .env_remove("RUST_LOG")
        .env_remove("WINDOCK_LOG_LEVEL")
        .output()
        .unwrap_or_else(|e| panic!("Failed to execute 'windock {}': {}", args.join(" "), e))
}

fn assert_success(output: &Output, what: &str) {
    assert!(
        output.status.success(),
        "{} failed with exit code {:?}. stderr: {}",
        what,
        output.status.code(),
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
fn test_help_lists_commands() {
    let home = TempDir::new().unwrap();
    let output = windock(home.path(), &["--help"]);
    assert_success(&output, "windock --help");

    let stdout = String::from_utf8_lossy(&output.stdout);
    for command in ["list", "add", "remove", "helpers", "clear", "watch", "activate", "apps"] {
        assert!(stdout.contains(command), "help should mention '{}'", command);
    }
}

#[test]
fn test_no_arguments_prints_help_and_fails() {
    let home = TempDir::new().unwrap();
    let output = windock(home.path(), &[]);
    assert!(!output.status.success());
}

#[test]
fn test_completions_bash() {
    let home = TempDir::new().unwrap();
    let output = windock(home.path(), &["completions", "bash"]);
    assert_success(&output, "windock completions bash");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("_windock"), "bash completion function missing");
}

#[test]
fn test_apps_list_is_clean_in_quiet_mode() {
    let home = TempDir::new().unwrap();
    let output = windock(home.path(), &["apps", "list"]);
    assert_success(&output, "windock apps list");

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(stdout.contains("VSCode"));
    assert!(stdout.contains("TextEdit"));
    assert!(
        !stdout.contains(r#""event":"#),
        "stdout should not contain JSON logs, got: {}",
        stdout
    );
    assert!(
        !stderr.contains(r#""level":"INFO""#),
        "Default mode should not emit INFO logs, got: {}",
        stderr
    );
}

#[test]
fn test_verbose_emits_json_logs_on_stderr() {
    let home = TempDir::new().unwrap();
    let output = windock(home.path(), &["-v", "apps", "list"]);
    assert_success(&output, "windock -v apps list");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("cli.apps_list_started"),
        "verbose mode should log command events, got: {}",
        stderr
    );
}

#[test]
fn test_apps_list_json_shows_default_subset() {
    let home = TempDir::new().unwrap();
    let output = windock(home.path(), &["apps", "list", "--json"]);
    assert_success(&output, "windock apps list --json");

    let apps: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let apps = apps.as_array().unwrap();
    assert_eq!(apps.len(), 10);

    let enabled = |label: &str| {
        apps.iter()
            .find(|a| a["label"] == label)
            .map(|a| a["enabled"] == true)
            .unwrap()
    };
    assert!(enabled("VSCode"));
    assert!(enabled("iTerm"));
    assert!(!enabled("Terminal"));
    assert!(!enabled("TextEdit"));
}

#[test]
fn test_apps_enable_persists() {
    let home = TempDir::new().unwrap();
    let output = windock(home.path(), &["apps", "enable", "textedit"]);
    assert_success(&output, "windock apps enable textedit");
    assert!(home.path().join("data/preferences.json").exists());

    let output = windock(home.path(), &["apps", "list", "--json"]);
    let apps: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let textedit = apps
        .as_array()
        .unwrap()
        .iter()
        .find(|a| a["label"] == "TextEdit")
        .unwrap();
    assert_eq!(textedit["enabled"], true);

    let output = windock(home.path(), &["apps", "reset"]);
    assert_success(&output, "windock apps reset");
    let output = windock(home.path(), &["apps", "list", "--json"]);
    let apps: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let textedit = apps
        .as_array()
        .unwrap()
        .iter()
        .find(|a| a["label"] == "TextEdit")
        .unwrap();
    assert_eq!(textedit["enabled"], false);
}

#[test]
fn test_apps_enable_unknown_fails() {
    let home = TempDir::new().unwrap();
    let output = windock(home.path(), &["apps", "enable", "Notepad"]);
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Known apps"), "stderr: {}", stderr);
}

#[test]
fn test_helpers_empty_data_dir() {
    let home = TempDir::new().unwrap();
    let output = windock(home.path(), &["helpers"]);
    assert_success(&output, "windock helpers");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("No helpers found."), "stdout: {}", stdout);
}

#[test]
fn test_helpers_json_empty_array() {
    let home = TempDir::new().unwrap();
    let output = windock(home.path(), &["helpers", "--json"]);
    assert_success(&output, "windock helpers --json");

    let helpers: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(helpers, serde_json::json!([]));
}

#[test]
fn test_clear_with_no_helpers() {
    let home = TempDir::new().unwrap();
    let output = windock(home.path(), &["clear", "--force"]);
    assert_success(&output, "windock clear --force");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("No helpers to remove."), "stdout: {}", stdout);
}
