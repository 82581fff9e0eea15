use assert_cmd::Command;
use predicates::prelude::*;

/// Help lists the subcommands
#[test]
fn test_cli_help() {
    let mut cmd = Command::cargo_bin("stack").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("expand"))
        .stdout(predicate::str::contains("validate"));
}

/// Version prints the package version
#[test]
fn test_cli_version() {
    let mut cmd = Command::cargo_bin("stack").unwrap();
    cmd.arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("stackform"));
}

/// Expand help mentions the format flag
#[test]
fn test_expand_help() {
    let mut cmd = Command::cargo_bin("stack").unwrap();
    cmd.arg("expand")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--format"))
        .stdout(predicate::str::contains("--manifest"));
}

/// Unknown subcommands fail
#[test]
fn test_invalid_command() {
    let mut cmd = Command::cargo_bin("stack").unwrap();
    cmd.arg("invalid-command").assert().failure();
}

/// Validate outside any project directory fails with the discovery error
#[test]
fn test_validate_without_manifest() {
    let temp_dir = tempfile::tempdir().unwrap();
    let mut cmd = Command::cargo_bin("stack").unwrap();
    cmd.current_dir(temp_dir.path())
        .env_remove("STACK_MANIFEST")
        .arg("validate")
        .assert()
        .failure();
}
