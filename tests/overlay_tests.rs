//! Overlay integration tests: install, list, verify and remove

mod common;

use common::TestGame;
use predicates::prelude::*;
use std::fs;

/// A provides x.ini; B overrides x.ini and adds y.ini
fn layered_game() -> TestGame {
    let game = TestGame::new();
    let a = game.loose_package("A.zip", &["x.ini"], "A");
    let b = game.loose_package("B.zip", &["x.ini", "y.ini"], "B");

    game.overlay_cmd()
        .args(["install", "--plain", "-x"])
        .arg(&a)
        .arg(&b)
        .assert()
        .success();
    game
}

#[test]
fn test_overlay_install_links_into_data() {
    let game = layered_game();

    assert_eq!(game.link_target("x.ini"), Some(game.overlay.join("B/x.ini")));
    assert_eq!(game.link_target("y.ini"), Some(game.overlay.join("B/y.ini")));
    assert_eq!(game.read_data("x.ini"), "B");

    let ledger = fs::read_to_string(game.ledger_path()).unwrap();
    assert!(ledger.contains("<overlay-config>"));
    assert!(ledger.contains(r#"<plugin name="A">"#));
    assert!(ledger.contains(r#"datapath="x.ini""#));
}

#[test]
fn test_list_packages_and_conflicts() {
    let game = layered_game();

    game.overlay_cmd()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Installed packages (2)"))
        .stdout(predicate::str::contains("B (2 files)"))
        .stdout(predicate::str::is_match(r"(?s)A .*B ").unwrap());

    game.overlay_cmd()
        .args(["list", "conflicts"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Conflicting files (1)"))
        .stdout(predicate::str::contains("x.ini"))
        .stdout(predicate::str::contains("owner B"))
        .stdout(predicate::str::contains("shadows A"));
}

#[test]
fn test_verify_clean_then_broken() {
    let game = layered_game();

    game.overlay_cmd()
        .args(["list", "verify"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Overlay is consistent."));

    fs::remove_file(game.overlay.join("A/x.ini")).unwrap();
    fs::remove_file(game.data_file("y.ini")).unwrap();

    game.overlay_cmd()
        .args(["list", "verify"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("[A] real file missing"))
        .stdout(predicate::str::contains("[B] link missing: y.ini"))
        .stderr(predicate::str::contains("2 overlay violation(s) found"));
}

#[test]
fn test_remove_restores_older_owner_then_unlinks() {
    let game = layered_game();

    game.overlay_cmd()
        .args(["remove", "B"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed B"))
        .stdout(predicate::str::contains("restored x.ini"));

    assert_eq!(game.link_target("x.ini"), Some(game.overlay.join("A/x.ini")));
    assert_eq!(game.read_data("x.ini"), "A");
    assert!(fs::symlink_metadata(game.data_file("y.ini")).is_err());
    assert!(!game.overlay.join("B").exists());

    game.overlay_cmd().args(["remove", "A"]).assert().success();

    assert!(fs::symlink_metadata(game.data_file("x.ini")).is_err());
    game.overlay_cmd()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No packages installed."));
}

#[test]
fn test_remove_middle_package_keeps_newest() {
    let game = layered_game();
    let c = game.loose_package("C.zip", &["x.ini"], "C");
    game.overlay_cmd()
        .args(["install", "--plain", "-x"])
        .arg(&c)
        .assert()
        .success();

    game.overlay_cmd().args(["remove", "B"]).assert().success();

    assert_eq!(game.read_data("x.ini"), "C");
    assert!(!game.overlay.join("B/x.ini").exists());

    game.overlay_cmd().args(["remove", "C"]).assert().success();
    assert_eq!(game.read_data("x.ini"), "A");
}

#[test]
fn test_remove_unknown_package() {
    let game = layered_game();

    game.overlay_cmd()
        .args(["remove", "Nope", "A"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Package 'Nope' not found"))
        .stderr(predicate::str::contains("1 of 2 package(s) failed"));

    let ledger = fs::read_to_string(game.ledger_path()).unwrap();
    assert!(!ledger.contains(r#"name="A""#));
}

#[test]
fn test_reinstall_is_rejected() {
    let game = layered_game();
    let a = game.downloads.join("A.zip");

    game.overlay_cmd()
        .args(["install", "--plain", "-x"])
        .arg(&a)
        .assert()
        .failure()
        .stderr(predicate::str::contains("already installed"));
}

#[test]
fn test_corrupt_ledger_aborts_without_rewrite() {
    let game = TestGame::new();
    fs::write(game.ledger_path(), "<overlay-config><plugin name=").unwrap();
    let a = game.loose_package("A.zip", &["a.esp"], "A");

    game.overlay_cmd()
        .args(["install", "--plain", "-x"])
        .arg(&a)
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be parsed"));

    assert_eq!(
        fs::read_to_string(game.ledger_path()).unwrap(),
        "<overlay-config><plugin name="
    );
    assert!(!game.data_file("a.esp").exists());
}

#[test]
fn test_foreign_ledger_file_is_not_overwritten() {
    let game = TestGame::new();
    let foreign = game.temp.path().join("settings.xml");
    let original = "<?xml version=\"1.0\"?>\n<settings><window width=\"800\"/></settings>\n";
    fs::write(&foreign, original).unwrap();
    let a = game.loose_package("A.zip", &["a.esp"], "A");

    game.overlay_cmd()
        .arg("--ledger")
        .arg(&foreign)
        .args(["install", "--plain", "-x"])
        .arg(&a)
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be parsed"));

    assert_eq!(fs::read_to_string(&foreign).unwrap(), original);
    assert!(!game.data_file("a.esp").exists());
}

#[test]
fn test_custom_ledger_location() {
    let game = TestGame::new();
    let ledger = game.temp.path().join("state/ledger.xml");
    let a = game.loose_package("A.zip", &["a.esp"], "A");

    game.overlay_cmd()
        .arg("--ledger")
        .arg(&ledger)
        .args(["install", "--plain", "-x"])
        .arg(&a)
        .assert()
        .success();

    assert!(ledger.is_file());
    assert!(!game.ledger_path().exists());
}
