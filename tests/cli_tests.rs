//! CLI integration tests using the REAL modlayer binary

mod common;

use common::{TestGame, modlayer_cmd};
use predicates::prelude::*;

#[test]
fn test_help_output() {
    modlayer_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("FOMOD"))
        .stdout(predicate::str::contains("install"))
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("remove"));
}

#[test]
fn test_version_output() {
    modlayer_cmd()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("modlayer"))
        .stdout(predicate::str::contains("Build info"));
}

#[test]
fn test_completions_output() {
    modlayer_cmd()
        .args(["completions", "--shell", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("modlayer"));
}

#[test]
fn test_install_without_archives_is_usage_error() {
    modlayer_cmd()
        .arg("install")
        .assert()
        .failure()
        .stderr(predicate::str::contains("ARCHIVE"));
}

#[test]
fn test_missing_archive_file() {
    let game = TestGame::new();
    game.cmd()
        .args(["install", "--plain", "does-not-exist.zip"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to open archive"));
}

#[test]
fn test_data_dir_from_environment() {
    let game = TestGame::new();
    let a = game.loose_package("A.zip", &["A.esp"], "TES4");

    modlayer_cmd()
        .env("MODLAYER_DATA", &game.data)
        .args(["install", "--plain", "-x"])
        .arg(&a)
        .assert()
        .success();

    assert!(game.data_file("A.esp").is_file());
}

#[test]
fn test_log_flag_writes_debug_to_stderr() {
    let game = TestGame::new();
    game.cmd()
        .args(["--log", "list"])
        .assert()
        .success()
        .stderr(predicate::str::contains("DEBUG"));
}

#[test]
fn test_empty_list_succeeds() {
    let game = TestGame::new();
    game.cmd()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No packages installed."));
}
