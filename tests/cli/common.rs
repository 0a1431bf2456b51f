//! Cross-cutting CLI tests (help, version, error handling)

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

#[test]
fn test_help() {
    cargo_bin_cmd!("inkdown")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Inkdown compiles inline Markdown"));
}

#[test]
fn test_version() {
    cargo_bin_cmd!("inkdown")
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_no_subcommand() {
    cargo_bin_cmd!("inkdown")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn test_invalid_subcommand() {
    cargo_bin_cmd!("inkdown")
        .arg("invalid")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

#[test]
fn test_render_help() {
    cargo_bin_cmd!("inkdown")
        .args(["render", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Compile an inline Markdown fragment"));
}

#[test]
fn test_grammar_help() {
    cargo_bin_cmd!("inkdown")
        .args(["grammar", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--variant"));
}

#[test]
fn test_invalid_variant() {
    cargo_bin_cmd!("inkdown")
        .args(["grammar", "--variant", "commonmark"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}
