//! `todo` binary commands

mod common;

use common::todo_command;
use predicates::prelude::*;
use tempfile::TempDir;

#[test]
fn test_help_lists_commands() {
    let dir = TempDir::new().unwrap();

    todo_command(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("seed"))
        .stdout(predicate::str::contains("suggest"));
}

#[test]
fn test_seed_then_reseed() {
    let dir = TempDir::new().unwrap();

    todo_command(dir.path())
        .arg("-q")
        .arg("seed")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Seeded 2 categories, 2 tasks, 2 context entries",
        ));

    todo_command(dir.path())
        .args(["-q", "seed", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"categories\": 0"));

    assert!(dir.path().join("smart-todo.db").exists());
}

#[test]
fn test_seed_database_flag_overrides_env() {
    let dir = TempDir::new().unwrap();
    let custom = dir.path().join("custom.db");

    todo_command(dir.path())
        .arg("-q")
        .arg("seed")
        .arg("--database")
        .arg(&custom)
        .assert()
        .success();

    assert!(custom.exists());
    assert!(!dir.path().join("smart-todo.db").exists());
}

#[test]
fn test_config_show_masks_key() {
    let dir = TempDir::new().unwrap();

    todo_command(dir.path())
        .env("GEMINI_API_KEY", "AIzaSyDsecretvalue")
        .env("TODO_PORT", "9001")
        .args(["config", "show", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("AIza...********"))
        .stdout(predicate::str::contains("9001"))
        .stdout(predicate::str::contains("secretvalue").not());
}

#[test]
fn test_invalid_port_env_is_reported() {
    let dir = TempDir::new().unwrap();

    todo_command(dir.path())
        .env("TODO_PORT", "not-a-port")
        .args(["config", "show"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("INVALID_INPUT"));
}

#[test]
fn test_invalid_log_level_env_is_reported() {
    let dir = TempDir::new().unwrap();

    todo_command(dir.path())
        .env("TODO_LOG_LEVEL", "verbose")
        .args(["config", "show"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("INVALID_INPUT"))
        .stderr(predicate::str::contains("TODO_LOG_LEVEL"));
}

#[test]
fn test_config_show_includes_log_retention() {
    let dir = TempDir::new().unwrap();

    todo_command(dir.path())
        .env("TODO_LOG_RETENTION_DAYS", "14")
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("TODO_LOG_RETENTION_DAYS"))
        .stdout(predicate::str::contains("14"));
}

#[test]
fn test_suggest_on_empty_database() {
    let dir = TempDir::new().unwrap();

    todo_command(dir.path())
        .args(["-q", "suggest"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No tasks found to analyze."));
}

#[test]
fn test_suggest_without_credential() {
    let dir = TempDir::new().unwrap();

    todo_command(dir.path())
        .args(["-q", "seed"])
        .assert()
        .success();

    todo_command(dir.path())
        .args(["-q", "suggest"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "LLM service credential not configured.",
        ));
}
