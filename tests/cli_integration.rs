//! CLI integration tests for titlesync
//!
//! These tests run the binary against a temporary vault and check the files
//! it leaves behind.

use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Get a command instance for the titlesync binary
fn titlesync_cmd() -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::new(assert_cmd::cargo::cargo_bin!("titlesync"));
    cmd.env_remove("TITLESYNC_VAULT").env_remove("RUST_LOG");
    cmd
}

/// Create a temporary directory and initialize a vault in it
fn setup_vault() -> TempDir {
    let dir = TempDir::new().unwrap();
    titlesync_cmd().arg("init").arg(dir.path()).assert().success();
    dir
}

fn write_note(dir: &Path, path: &str, text: &str) {
    let full = dir.join(path);
    if let Some(parent) = full.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(full, text).unwrap();
}

fn read_note(dir: &Path, path: &str) -> String {
    fs::read_to_string(dir.join(path)).unwrap()
}

// =============================================================================
// Initialization Tests
// =============================================================================

#[test]
fn test_init_creates_structure() {
    let dir = TempDir::new().unwrap();

    titlesync_cmd()
        .arg("init")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized titlesync"));

    assert!(dir.path().join(".titlesync").is_dir());
    assert!(dir.path().join(".titlesync/config.toml").is_file());
    assert!(dir.path().join(".titlesync/.gitignore").is_file());
}

#[test]
fn test_init_is_idempotent() {
    let dir = TempDir::new().unwrap();

    titlesync_cmd().arg("init").arg(dir.path()).assert().success();
    titlesync_cmd().arg("init").arg(dir.path()).assert().success();
}

#[test]
fn test_commands_require_vault() {
    let dir = TempDir::new().unwrap();

    titlesync_cmd()
        .current_dir(dir.path())
        .arg("status")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not in a titlesync vault"));
}

// =============================================================================
// Sync Tests
// =============================================================================

#[test]
fn test_open_inserts_heading() {
    let dir = setup_vault();
    write_note(dir.path(), "My Note.md", "Some text\n");

    titlesync_cmd()
        .current_dir(dir.path())
        .args(["open", "My Note.md"])
        .assert()
        .success()
        .stdout(predicate::str::contains("heading set to 'My Note'"));

    assert_eq!(read_note(dir.path(), "My Note.md"), "# My Note\nSome text\n");
}

#[test]
fn test_open_twice_is_a_no_op() {
    let dir = setup_vault();
    write_note(dir.path(), "A.md", "# A\n");

    titlesync_cmd()
        .current_dir(dir.path())
        .args(["open", "A.md"])
        .assert()
        .success()
        .stdout(predicate::str::contains("already in sync"));
}

#[test]
fn test_sync_heading_to_filename_renames() {
    let dir = setup_vault();
    write_note(dir.path(), "notes/Draft.md", "# Weekly Plan\n");

    titlesync_cmd()
        .current_dir(dir.path())
        .args(["sync", "heading-to-filename", "notes/Draft.md"])
        .assert()
        .success()
        .stdout(predicate::str::contains("renamed notes/Draft.md -> notes/Weekly Plan.md"));

    assert!(!dir.path().join("notes/Draft.md").exists());
    assert_eq!(read_note(dir.path(), "notes/Weekly Plan.md"), "# Weekly Plan\n");
}

#[test]
fn test_sync_filename_to_frontmatter() {
    let dir = setup_vault();
    write_note(dir.path(), "Reading List.md", "- a book\n");

    titlesync_cmd()
        .current_dir(dir.path())
        .args(["sync", "filename-to-frontmatter", "Reading List.md"])
        .assert()
        .success();

    assert_eq!(
        read_note(dir.path(), "Reading List.md"),
        "---\ntitle: \"Reading List\"\n---\n- a book\n"
    );
}

#[test]
fn test_sync_rejects_unknown_direction() {
    let dir = setup_vault();
    write_note(dir.path(), "A.md", "# A\n");

    titlesync_cmd()
        .current_dir(dir.path())
        .args(["sync", "sideways", "A.md"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown direction"));
}

#[test]
fn test_sync_rename_collision_fails() {
    let dir = setup_vault();
    write_note(dir.path(), "Draft.md", "# Taken\n");
    write_note(dir.path(), "Taken.md", "keep me\n");

    titlesync_cmd()
        .current_dir(dir.path())
        .args(["sync", "heading-to-filename", "Draft.md"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    assert_eq!(read_note(dir.path(), "Taken.md"), "keep me\n");
    assert!(dir.path().join("Draft.md").exists());
}

#[test]
fn test_non_markdown_is_rejected() {
    let dir = setup_vault();
    write_note(dir.path(), "image.png", "");

    titlesync_cmd()
        .current_dir(dir.path())
        .args(["open", "image.png"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not a markdown note"));
}

#[test]
fn test_vault_flag_from_elsewhere() {
    let dir = setup_vault();
    let elsewhere = TempDir::new().unwrap();
    write_note(dir.path(), "Remote.md", "");

    titlesync_cmd()
        .current_dir(elsewhere.path())
        .arg("--vault")
        .arg(dir.path())
        .arg("open")
        .arg(dir.path().join("Remote.md"))
        .assert()
        .success();

    assert_eq!(read_note(dir.path(), "Remote.md"), "# Remote\n");
}

// =============================================================================
// File List Tests
// =============================================================================

#[test]
fn test_ignore_stops_syncing() {
    let dir = setup_vault();
    write_note(dir.path(), "Keep.md", "# Different\n");

    titlesync_cmd()
        .current_dir(dir.path())
        .args(["ignore", "Keep.md"])
        .assert()
        .success()
        .stdout(predicate::str::contains("no longer synced"));

    titlesync_cmd()
        .current_dir(dir.path())
        .args(["open", "Keep.md"])
        .assert()
        .success()
        .stdout(predicate::str::contains("skipped (ignored)"));

    assert_eq!(read_note(dir.path(), "Keep.md"), "# Different\n");

    let config = fs::read_to_string(dir.path().join(".titlesync/config.toml")).unwrap();
    assert!(config.contains("Keep.md"));
}

#[test]
fn test_ignored_lists_files_as_json() {
    let dir = setup_vault();
    write_note(dir.path(), "A.md", "");

    titlesync_cmd()
        .current_dir(dir.path())
        .args(["ignore", "A.md"])
        .assert()
        .success();

    let output = titlesync_cmd()
        .current_dir(dir.path())
        .args(["ignored", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["mode"], "ignore");
    assert_eq!(json["files"][0]["path"], "A.md");
}

#[test]
fn test_unignore_resumes_syncing() {
    let dir = setup_vault();
    write_note(dir.path(), "A.md", "# B\n");

    titlesync_cmd()
        .current_dir(dir.path())
        .args(["ignore", "A.md"])
        .assert()
        .success();
    titlesync_cmd()
        .current_dir(dir.path())
        .args(["unignore", "A.md"])
        .assert()
        .success()
        .stdout(predicate::str::contains("synced again"));

    titlesync_cmd()
        .current_dir(dir.path())
        .args(["open", "A.md"])
        .assert()
        .success();
    assert_eq!(read_note(dir.path(), "A.md"), "# A\n");
}

// =============================================================================
// Status and Config Tests
// =============================================================================

#[test]
fn test_status_reports_disagreement() {
    let dir = setup_vault();
    write_note(dir.path(), "Same.md", "# Same\n");
    write_note(dir.path(), "sub/Other.md", "---\ntitle: Else\n---\n# Other\n");

    let output = titlesync_cmd()
        .current_dir(dir.path())
        .args(["status", "--out-of-sync", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let notes = json.as_array().unwrap();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0]["path"], "sub/Other.md");
    assert_eq!(notes[0]["frontmatter"]["text"], "Else");
    assert_eq!(notes[0]["in_sync"], false);
}

#[test]
fn test_status_text_table() {
    let dir = setup_vault();
    write_note(dir.path(), "Same.md", "# Same\n");

    titlesync_cmd()
        .current_dir(dir.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Same.md"))
        .stdout(predicate::str::contains("heading 'Same' (line 1)"));
}

#[test]
fn test_config_show_and_path() {
    let dir = setup_vault();

    titlesync_cmd()
        .current_dir(dir.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("frontmatter_key = \"title\""))
        .stdout(predicate::str::contains("[filename_targets]"));

    titlesync_cmd()
        .current_dir(dir.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_invalid_config_is_reported() {
    let dir = setup_vault();
    fs::write(
        dir.path().join(".titlesync/config.toml"),
        "debounce_ms = 0\n",
    )
    .unwrap();

    titlesync_cmd()
        .current_dir(dir.path())
        .arg("ignored")
        .assert()
        .failure()
        .stderr(predicate::str::contains("debounce_ms"));
}
