use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn help_lists_connection_flags() {
    Command::cargo_bin("cli")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--server"))
        .stdout(predicate::str::contains("--token"));
}

#[test]
fn missing_token_is_rejected_before_connecting() {
    Command::cargo_bin("cli")
        .unwrap()
        .assert()
        .failure()
        .stdout(predicate::str::contains("--token is required"));
}

#[test]
fn unknown_flag_is_rejected() {
    Command::cargo_bin("cli")
        .unwrap()
        .arg("--no-such-flag")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unexpected argument"));
}
