//! Integration tests for the docsync CLI binary.
//!
//! These tests exercise the local commands (check, fix, assemble) of the
//! compiled binary using assert_cmd.

use assert_cmd::Command;
use docsync_test_utils::document::TestDocument;
use predicates::prelude::*;
use serde_json::json;

/// Get a Command for the docsync binary, isolated from the user's targets.
fn docsync_cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("docsync"));
    cmd.env("DOCSYNC_CONFIG", "/nonexistent/docsync/targets.toml")
        .env_remove("DOCSYNC_SERVER")
        .env_remove("DOCSYNC_USERNAME")
        .env_remove("DOCSYNC_PASSWORD");
    cmd
}

// ============================================================================
// Help and Version Tests
// ============================================================================

#[test]
fn test_help_lists_commands() {
    let mut cmd = docsync_cmd();
    cmd.arg("--help").assert().success().stdout(
        predicate::str::contains("push")
            .and(predicate::str::contains("pull"))
            .and(predicate::str::contains("check"))
            .and(predicate::str::contains("fix"))
            .and(predicate::str::contains("assemble")),
    );
}

#[test]
fn test_version_output() {
    let mut cmd = docsync_cmd();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("docsync"));
}

#[test]
fn test_missing_command_fails() {
    let mut cmd = docsync_cmd();
    cmd.assert().failure();
}

// ============================================================================
// Check / Fix Tests
// ============================================================================

#[test]
fn test_check_clean_document() {
    let doc = TestDocument::minimal("/blog");

    let mut cmd = docsync_cmd();
    cmd.current_dir(doc.root())
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("No issues found"));
}

#[test]
fn test_check_from_inside_template_directory() {
    let doc = TestDocument::new();
    doc.settings("", json!({"path": "/blog", "template_path": "/layout"}))
        .write("content.md", "# Blog")
        .settings("template", json!({"path": "/layout"}))
        .write("template/content.html", "<main></main>");

    let mut cmd = docsync_cmd();
    cmd.current_dir(doc.dir("template"))
        .arg("check")
        .assert()
        .success();
}

#[test]
fn test_check_reports_undeclared_template() {
    let doc = TestDocument::minimal("/blog");
    doc.settings("template", json!({"path": "/layout"}))
        .write("template/content.html", "<main></main>");

    let mut cmd = docsync_cmd();
    cmd.current_dir(doc.root())
        .arg("check")
        .assert()
        .failure()
        .stdout(predicate::str::contains("docsync fix"))
        .stderr(predicate::str::contains("1 issue(s) found"));
}

#[test]
fn test_fix_then_check_passes() {
    let doc = TestDocument::minimal("/blog");
    doc.mkdir("template").write("template/content.html", "<main></main>");

    let mut cmd = docsync_cmd();
    cmd.current_dir(doc.root()).arg("fix").assert().success();

    assert_eq!(doc.read_settings("")["template_path"], json!("/blog/template"));
    assert_eq!(doc.read_settings("template")["path"], json!("/blog/template"));

    let mut cmd = docsync_cmd();
    cmd.current_dir(doc.root()).arg("check").assert().success();
}

#[test]
fn test_fix_leaves_collisions_for_the_user() {
    let doc = TestDocument::new();
    doc.settings("", json!({"path": "/blog", "template_path": "/blog"}))
        .write("content.md", "# Blog");

    let mut cmd = docsync_cmd();
    cmd.current_dir(doc.root())
        .arg("fix")
        .assert()
        .failure()
        .stdout(predicate::str::contains("Manual intervention"));
}

#[test]
fn test_check_outside_document_fails() {
    let doc = TestDocument::new();

    let mut cmd = docsync_cmd();
    cmd.current_dir(doc.root())
        .arg("check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error").and(predicate::str::contains("No document found")));
}

// ============================================================================
// Assemble Tests
// ============================================================================

#[test]
fn test_assemble_summary() {
    let doc = TestDocument::new();
    doc.settings("", json!({"path": "/blog", "template_path": "/layout"}))
        .write("content.md", "# Blog")
        .write("style.css", "body {}")
        .settings("template", json!({"path": "/layout"}))
        .write("template/content.html", "<main><%~ it.content %></main>");

    let mut cmd = docsync_cmd();
    cmd.current_dir(doc.root())
        .arg("assemble")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("/blog")
                .and(predicate::str::contains("/layout"))
                .and(predicate::str::contains("style"))
                .and(predicate::str::contains("eta")),
        );
}

#[test]
fn test_assemble_json_output() {
    let doc = TestDocument::minimal("/blog");
    doc.write("data.yaml", "title: Blog");

    let mut cmd = docsync_cmd();
    let output = cmd
        .current_dir(doc.root())
        .args(["assemble", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["path"], json!("/blog"));
    assert_eq!(value["data_type"], json!("yaml"));
    assert_eq!(value["extension"], json!(".html"));
}

#[test]
fn test_assemble_ambiguous_content_fails() {
    let doc = TestDocument::minimal("/blog");
    doc.write("content.html", "<p>two</p>");

    let mut cmd = docsync_cmd();
    cmd.current_dir(doc.root())
        .arg("assemble")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_push_without_server_or_targets_fails() {
    let doc = TestDocument::minimal("/blog");

    let mut cmd = docsync_cmd();
    cmd.current_dir(doc.root())
        .args(["push", "--yes"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration not found"));
}
