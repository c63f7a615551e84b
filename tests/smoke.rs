//! Smoke tests -- verify the binary runs and key subcommands exist.

use assert_cmd::Command;

#[test]
fn test_cli_help() {
    Command::cargo_bin("sandcheck")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicates::str::contains(
            "Diagnostic check suite for cloud sandbox environments",
        ));
}

#[test]
fn test_cli_version() {
    Command::cargo_bin("sandcheck")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicates::str::contains("sandcheck"));
}

#[test]
fn test_run_subcommand_exists() {
    Command::cargo_bin("sandcheck")
        .unwrap()
        .args(["run", "--help"])
        .assert()
        .success()
        .stdout(predicates::str::contains("--only"));
}

#[test]
fn test_list_prints_registered_checks() {
    Command::cargo_bin("sandcheck")
        .unwrap()
        .arg("list")
        .assert()
        .success()
        .stdout(predicates::str::contains("sandbox-lifecycle"))
        .stdout(predicates::str::contains("exec-commands"))
        .stdout(predicates::str::contains("lsp"));
}

#[test]
fn test_run_without_api_key_fails() {
    Command::cargo_bin("sandcheck")
        .unwrap()
        .arg("run")
        .env_remove("SANDCHECK_API_KEY")
        // Run from a directory with no sandcheck.toml.
        .current_dir(std::env::temp_dir())
        .assert()
        .failure()
        .stderr(predicates::str::contains("SANDCHECK_API_KEY"));
}
