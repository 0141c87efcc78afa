//! Process-level checks that need no SMB server: everything here fails (or succeeds)
//! before `smbclient` would be started.

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

fn get_sharewalk_cmd() -> Command {
    let mut cmd = Command::cargo_bin("sharewalk").unwrap();
    for var in [
        "SHAREWALK_SERVER",
        "SHAREWALK_DOMAIN",
        "SHAREWALK_USERNAME",
        "SHAREWALK_PASSWORD",
        "SHAREWALK_TIMEOUT_SECS",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

#[test]
fn test_help_lists_subcommands() {
    get_sharewalk_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("probe"))
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("report"));
}

#[test]
fn test_malformed_address_exits_one() {
    get_sharewalk_cmd()
        .args(["--server", "invalid-address", "probe"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("connectivity_failure"));
}

#[test]
fn test_missing_server_exits_two() {
    get_sharewalk_cmd()
        .arg("probe")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("SHAREWALK_SERVER"));
}

#[test]
fn test_password_without_username_exits_two() {
    get_sharewalk_cmd()
        .args(["--server", "smb://nas.invalid/share/", "--password", "hunter2", "probe"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("invalid_config"))
        .stderr(predicate::str::contains("hunter2").not());
}

#[test]
fn test_invalid_search_pattern_exits_two() {
    get_sharewalk_cmd()
        .args(["--server", "smb://nas.invalid/share/", "list", "--search", "("])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("pattern_syntax_error"));
}

#[test]
fn test_server_from_environment() {
    get_sharewalk_cmd()
        .env("SHAREWALK_SERVER", "http://nas/share/")
        .arg("probe")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Unsupported scheme"));
}

#[test]
fn test_conflicting_views_rejected_by_parser() {
    get_sharewalk_cmd()
        .args(["--server", "smb://nas.invalid/share/", "list", "--files-only", "--dirs-only"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}
