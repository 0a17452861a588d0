//! [`TestDocument`] builder for document-tree test scenarios.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// A temporary document directory with helpers for laying out a
/// root/template/slot tree and asserting on it.
///
/// # Example
///
/// ```rust,no_run
/// use docsync_test_utils::document::TestDocument;
/// use serde_json::json;
///
/// let doc = TestDocument::new();
/// doc.settings("", json!({"path": "/blog", "template_path": "/layout"}))
///     .write("content.md", "# Blog")
///     .settings("template", json!({"path": "/layout"}))
///     .write("template/content.html", "<main><%= it.content %></main>");
/// doc.assert_file_exists("template/settings.json");
/// ```
pub struct TestDocument {
    temp_dir: TempDir,
}

impl Default for TestDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl TestDocument {
    /// Create an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    /// A minimal valid document: `settings.json` with `path` plus `content.md`.
    pub fn minimal(path: &str) -> Self {
        let doc = Self::new();
        doc.settings("", serde_json::json!({ "path": path }))
            .write("content.md", "# Hello");
        doc
    }

    /// Return the root path of the temporary directory.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Resolve `rel` against the root; `""` is the root itself.
    pub fn dir(&self, rel: &str) -> PathBuf {
        if rel.is_empty() {
            self.root().to_path_buf()
        } else {
            self.root().join(rel)
        }
    }

    /// Write `content` to `rel`, creating parent directories.
    pub fn write(&self, rel: &str, content: impl AsRef<[u8]>) -> &Self {
        let path = self.root().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        self
    }

    /// Write `settings.json` in the directory `rel_dir`.
    pub fn settings(&self, rel_dir: &str, value: serde_json::Value) -> &Self {
        let dir = self.dir(rel_dir);
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join("settings.json"),
            serde_json::to_string_pretty(&value).unwrap(),
        )
        .unwrap();
        self
    }

    /// Create an empty directory at `rel`.
    pub fn mkdir(&self, rel: &str) -> &Self {
        fs::create_dir_all(self.root().join(rel)).unwrap();
        self
    }

    /// Read `rel` as text.
    pub fn read(&self, rel: &str) -> String {
        let path = self.root().join(rel);
        fs::read_to_string(&path)
            .unwrap_or_else(|_| panic!("Could not read file: {}", path.display()))
    }

    /// Read `rel` as raw bytes.
    pub fn read_bytes(&self, rel: &str) -> Vec<u8> {
        let path = self.root().join(rel);
        fs::read(&path).unwrap_or_else(|_| panic!("Could not read file: {}", path.display()))
    }

    /// Parse the `settings.json` of `rel_dir`.
    pub fn read_settings(&self, rel_dir: &str) -> serde_json::Value {
        let path = self.dir(rel_dir).join("settings.json");
        let text = fs::read_to_string(&path)
            .unwrap_or_else(|_| panic!("Could not read settings: {}", path.display()));
        serde_json::from_str(&text).unwrap()
    }

    /// Assert that `path` (relative to the root) exists.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path does not exist.
    pub fn assert_file_exists(&self, path: &str) {
        let full_path = self.root().join(path);
        assert!(
            full_path.exists(),
            "Expected file to exist: {}",
            full_path.display()
        );
    }

    /// Assert that `path` (relative to the root) does **not** exist.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path exists.
    pub fn assert_file_not_exists(&self, path: &str) {
        let full_path = self.root().join(path);
        assert!(
            !full_path.exists(),
            "Expected file NOT to exist: {}",
            full_path.display()
        );
    }
}
