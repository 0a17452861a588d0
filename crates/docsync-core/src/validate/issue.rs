//! Issue and fix types produced by tree validation

use std::fmt;
use std::path::{Path, PathBuf};

use docsync_meta::{Reference, Settings};
use serde::Serialize;

use crate::Result;

/// Category of a validation issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IssueKind {
    /// Settings drift or missing files; usually fixable
    Configuration,
    /// Ambiguous addressing (collisions, mismatches); never auto-resolved
    Consistency,
}

/// A single problem found in a document tree.
#[derive(Debug, Clone, Serialize)]
pub struct Issue {
    /// Node the issue was found on
    #[serde(serialize_with = "serialize_reference")]
    pub reference: Reference,
    /// Directory of that node
    pub dir: PathBuf,
    pub kind: IssueKind,
    /// Human-readable description
    pub message: String,
    /// Action that repairs the issue, if one exists
    pub fix: Option<Fix>,
}

impl Issue {
    pub(crate) fn configuration(reference: Reference, dir: &Path, message: String) -> Self {
        Self {
            reference,
            dir: dir.to_path_buf(),
            kind: IssueKind::Configuration,
            message,
            fix: None,
        }
    }

    pub(crate) fn consistency(reference: Reference, dir: &Path, message: String) -> Self {
        Self {
            reference,
            dir: dir.to_path_buf(),
            kind: IssueKind::Consistency,
            message,
            fix: None,
        }
    }

    pub(crate) fn with_fix(mut self, fix: Fix) -> Self {
        self.fix = Some(fix);
        self
    }

    pub fn is_fixable(&self) -> bool {
        self.fix.is_some()
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.reference, self.message)
    }
}

fn serialize_reference<S: serde::Serializer>(
    reference: &Reference,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_str(reference)
}

/// A repair action. Each fix re-reads the settings it touches when applied,
/// so several fixes against the same file compose.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Fix {
    /// Write a new `settings.json` into a child directory
    CreateSettings {
        dir: PathBuf,
        path: String,
        uploads: Vec<String>,
    },
    /// Set `path` in an existing `settings.json` that lacks one
    SetPath { dir: PathBuf, path: String },
    /// Set `template_path`/`slot_path` in the settings of `dir`
    SetPointer {
        dir: PathBuf,
        #[serde(serialize_with = "serialize_reference")]
        child: Reference,
        value: String,
    },
    /// Overwrite the `uploads` array in the settings of `dir`
    SetUploads { dir: PathBuf, uploads: Vec<String> },
}

impl Fix {
    /// Apply this fix to the filesystem.
    pub fn apply(&self) -> Result<()> {
        match self {
            Fix::CreateSettings { dir, path, uploads } => {
                let mut settings = Settings::with_path(path.clone());
                if !uploads.is_empty() {
                    settings.uploads = Some(uploads.clone());
                }
                settings.save(dir)?;
            }
            Fix::SetPath { dir, path } => {
                let mut settings = Settings::load(dir)?;
                settings.path = Some(path.clone());
                settings.save(dir)?;
            }
            Fix::SetPointer { dir, child, value } => {
                let mut settings = Settings::load(dir)?;
                settings.set_pointer(*child, Some(value.clone()));
                settings.save(dir)?;
            }
            Fix::SetUploads { dir, uploads } => {
                let mut settings = Settings::load(dir)?;
                settings.uploads = Some(uploads.clone());
                settings.save(dir)?;
            }
        }
        tracing::debug!(fix = %self, "Applied fix");
        Ok(())
    }
}

impl fmt::Display for Fix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fix::CreateSettings { dir, path, .. } => {
                write!(f, "create {}/settings.json with path {}", dir.display(), path)
            }
            Fix::SetPath { dir, path } => {
                write!(f, "set path = {} in {}/settings.json", path, dir.display())
            }
            Fix::SetPointer { dir, child, value } => write!(
                f,
                "set {} = {} in {}/settings.json",
                child.pointer_key(),
                value,
                dir.display()
            ),
            Fix::SetUploads { dir, uploads } => write!(
                f,
                "set uploads = {:?} in {}/settings.json",
                uploads,
                dir.display()
            ),
        }
    }
}

/// Apply every fix carried by `issues`, in order. Returns the number applied.
pub fn apply_fixes(issues: &[Issue]) -> Result<usize> {
    let mut applied = 0;
    for fix in issues.iter().filter_map(|i| i.fix.as_ref()) {
        fix.apply()?;
        applied += 1;
    }
    Ok(applied)
}
