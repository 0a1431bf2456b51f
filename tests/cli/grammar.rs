//! Grammar subcommand tests

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use tempfile::TempDir;

fn grammar_json(temp_dir: &TempDir, args: &[&str]) -> Value {
    let output = cargo_bin_cmd!("inkdown")
        .current_dir(temp_dir.path())
        .env("XDG_CONFIG_HOME", temp_dir.path().join("xdg"))
        .arg("grammar")
        .args(args)
        .arg("--json")
        .output()
        .unwrap();
    assert!(output.status.success());
    serde_json::from_slice(&output.stdout).unwrap()
}

fn rule_names(dump: &Value) -> Vec<&str> {
    dump["rules"]
        .as_array()
        .unwrap()
        .iter()
        .map(|rule| rule["name"].as_str().unwrap())
        .collect()
}

#[test]
fn test_grammar_text_listing() {
    cargo_bin_cmd!("inkdown")
        .args(["grammar", "--variant", "standard"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("escape "))
        .stdout(predicate::str::contains("\ntext "))
        .stdout(predicate::str::contains("\ndel ").not());
}

#[test]
fn test_grammar_json_gfm() {
    let temp_dir = TempDir::new().unwrap();
    let dump = grammar_json(&temp_dir, &["--variant", "gfm"]);

    assert_eq!(dump["variant"], "gfm");
    assert_eq!(
        rule_names(&dump),
        [
            "escape", "autolink", "url", "tag", "link", "reflink", "nolink", "strong", "em",
            "code", "br", "del", "text"
        ]
    );
}

#[test]
fn test_grammar_json_breaks() {
    let temp_dir = TempDir::new().unwrap();
    let dump = grammar_json(&temp_dir, &["--variant", "breaks"]);

    assert_eq!(dump["variant"], "gfm+breaks");
    let br = dump["rules"]
        .as_array()
        .unwrap()
        .iter()
        .find(|rule| rule["name"] == "br")
        .unwrap();
    assert_eq!(br["pattern"], r"^ *\n(?!\s*$)");
}

#[test]
fn test_grammar_defaults_to_configured_variant() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join(".inkdown.toml"),
        "gfm = false\npedantic = true\n",
    )
    .unwrap();

    let dump = grammar_json(&temp_dir, &[]);
    assert_eq!(dump["variant"], "pedantic");
    assert_eq!(rule_names(&dump).len(), 11);
}
