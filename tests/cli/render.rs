//! Render subcommand tests

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// A command running in an empty directory with no user config.
fn isolated(temp_dir: &TempDir) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("inkdown");
    cmd.current_dir(temp_dir.path())
        .env("XDG_CONFIG_HOME", temp_dir.path().join("xdg"));
    cmd
}

#[test]
fn test_render_stdin() {
    let temp_dir = TempDir::new().unwrap();
    isolated(&temp_dir)
        .arg("render")
        .write_stdin("**bold** and `code`\n")
        .assert()
        .success()
        .stdout("<strong>bold</strong> and <code>code</code>\n");
}

#[test]
fn test_render_strips_only_one_newline() {
    let temp_dir = TempDir::new().unwrap();
    isolated(&temp_dir)
        .arg("render")
        .write_stdin("a\n\n")
        .assert()
        .success()
        .stdout("a\n\n");
}

#[test]
fn test_render_file() {
    let temp_dir = TempDir::new().unwrap();
    let test_file = temp_dir.path().join("fragment.md");
    fs::write(&test_file, "see [docs](/d \"Docs\")\n").unwrap();

    isolated(&temp_dir)
        .args(["render", test_file.to_str().unwrap()])
        .assert()
        .success()
        .stdout("see <a href=\"/d\" title=\"Docs\">docs</a>\n");
}

#[test]
fn test_render_missing_file() {
    let temp_dir = TempDir::new().unwrap();
    isolated(&temp_dir)
        .args(["render", "does-not-exist.md"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn test_render_discovers_config_next_to_file() {
    let temp_dir = TempDir::new().unwrap();
    let test_file = temp_dir.path().join("fragment.md");
    fs::write(&test_file, "~~old~~ http://x.y").unwrap();
    fs::write(temp_dir.path().join(".inkdown.toml"), "gfm = false\n").unwrap();

    isolated(&temp_dir)
        .args(["render", test_file.to_str().unwrap()])
        .assert()
        .success()
        .stdout("~~old~~ http://x.y\n");
}

#[test]
fn test_render_explicit_config() {
    let temp_dir = TempDir::new().unwrap();
    let config_file = temp_dir.path().join("custom.toml");
    fs::write(&config_file, "xhtml = true\n").unwrap();

    isolated(&temp_dir)
        .args(["render", "--config", config_file.to_str().unwrap()])
        .write_stdin("a  \nb")
        .assert()
        .success()
        .stdout("a<br/>b\n");
}

#[test]
fn test_render_invalid_config() {
    let temp_dir = TempDir::new().unwrap();
    let config_file = temp_dir.path().join("custom.toml");
    fs::write(&config_file, "gfm = \"maybe\"\n").unwrap();

    isolated(&temp_dir)
        .args(["render", "--config", config_file.to_str().unwrap()])
        .write_stdin("x")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid config"));
}

#[test]
fn test_flags_override_config() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("inkdown.toml"), "gfm = false\n").unwrap();

    isolated(&temp_dir)
        .args(["render", "--gfm"])
        .write_stdin("~~old~~")
        .assert()
        .success()
        .stdout("<del>old</del>\n");

    isolated(&temp_dir)
        .args(["render", "--gfm", "--no-gfm"])
        .write_stdin("~~old~~")
        .assert()
        .success()
        .stdout("~~old~~\n");
}

#[test]
fn test_render_with_links_file() {
    let temp_dir = TempDir::new().unwrap();
    let links_file = temp_dir.path().join("links.toml");
    fs::write(
        &links_file,
        "[home]\nhref = \"https://example.com\"\ntitle = \"Home\"\n",
    )
    .unwrap();

    isolated(&temp_dir)
        .args(["render", "--links", links_file.to_str().unwrap()])
        .write_stdin("[Home] and [away][]")
        .assert()
        .success()
        .stdout("<a href=\"https://example.com\" title=\"Home\">Home</a> and [away][]\n");
}

#[test]
fn test_render_invalid_links_file() {
    let temp_dir = TempDir::new().unwrap();
    let links_file = temp_dir.path().join("links.toml");
    fs::write(&links_file, "home = 3\n").unwrap();

    isolated(&temp_dir)
        .args(["render", "--links", links_file.to_str().unwrap()])
        .write_stdin("[home]")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid links file"));
}

#[test]
fn test_render_no_mangle() {
    let temp_dir = TempDir::new().unwrap();
    isolated(&temp_dir)
        .args(["render", "--no-mangle"])
        .write_stdin("<a@b.c>")
        .assert()
        .success()
        .stdout("<a href=\"mailto:a@b.c\">a@b.c</a>\n");
}

#[test]
fn test_render_mangles_by_default() {
    let temp_dir = TempDir::new().unwrap();
    isolated(&temp_dir)
        .arg("render")
        .write_stdin("<someone@example.com>")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("<a href=\""))
        .stdout(predicate::str::contains("undefined").not());
}

#[test]
fn test_render_sanitize() {
    let temp_dir = TempDir::new().unwrap();
    isolated(&temp_dir)
        .args(["render", "--sanitize"])
        .write_stdin("<script>x</script> [a](javascript:x)")
        .assert()
        .success()
        .stdout("&lt;script&gt;x&lt;/script&gt; a\n");
}

#[test]
fn test_render_smartypants_and_breaks() {
    let temp_dir = TempDir::new().unwrap();
    isolated(&temp_dir)
        .args(["render", "--smartypants", "--breaks"])
        .write_stdin("it's\nover...")
        .assert()
        .success()
        .stdout("it\u{2019}s<br>over\u{2026}\n");
}

#[test]
fn test_render_max_nesting() {
    let temp_dir = TempDir::new().unwrap();
    isolated(&temp_dir)
        .args(["render", "--max-nesting", "0"])
        .write_stdin("**a *b***")
        .assert()
        .success()
        .stdout("<strong>a *b*</strong>\n");
}
