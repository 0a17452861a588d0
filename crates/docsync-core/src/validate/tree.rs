//! Fractal validation of a root/template/slot document tree

use std::path::{Path, PathBuf};

use docsync_fs::{DocPath, io};
use docsync_meta::{Reference, Settings, default_child_path, normalize_document_path};

use super::issue::{Fix, Issue};
use crate::{Error, Result};

/// Validate the document tree rooted at `dir`.
///
/// A root without `settings.json` or without a `path` cannot be validated
/// at all and is returned as an error. Every other problem is reported as
/// an [`Issue`].
pub fn validate_tree(dir: &Path) -> Result<Vec<Issue>> {
    let settings = Settings::load(dir)?;
    if settings.require_path(dir).is_err() {
        return Err(Error::MissingPath {
            dir: dir.to_path_buf(),
        });
    }
    validate_node(Reference::Root, dir, &settings, &[])
}

/// Validate one node and recurse into its existing template/slot children.
///
/// `forbidden` holds every ancestor and sibling path this node's path must
/// differ from. The function keeps no state between calls.
pub fn validate_node(
    reference: Reference,
    dir: &Path,
    settings: &Settings,
    forbidden: &[String],
) -> Result<Vec<Issue>> {
    let mut issues = Vec::new();

    let Some(path) = declared_path(settings) else {
        issues.push(Issue::configuration(
            reference,
            dir,
            format!("{} has no path", Settings::file(dir).display()),
        ));
        return Ok(issues);
    };

    if forbidden.contains(&path) {
        issues.push(Issue::consistency(
            reference,
            dir,
            format!("path {path} collides with an ancestor or sibling"),
        ));
    }

    let children = Reference::CHILDREN.map(|child| ChildState::read(dir, child, settings));
    let effective = [0, 1].map(|index| children[index].effective_path(&path));
    let blocked =
        check_inherited_paths(&mut issues, dir, &path, forbidden, &children, &effective);

    for (index, child) in children.iter().enumerate() {
        match child {
            ChildState::Absent { .. } => {}
            ChildState::Unreadable {
                reference: child_ref,
                dir,
                message,
                ..
            } => issues.push(Issue::configuration(
                *child_ref,
                dir,
                format!("unreadable settings: {message}"),
            )),
            ChildState::Present {
                reference: child_ref,
                dir: child_dir,
                own,
                ..
            } => check_child(
                &mut issues,
                reference,
                dir,
                settings,
                ChildTarget {
                    reference: *child_ref,
                    dir: child_dir,
                    own: own.as_ref(),
                    path: effective[index].as_deref(),
                    blocked: blocked[index],
                },
            )?,
        }
    }

    check_uploads(&mut issues, reference, dir, settings)?;

    for (index, child) in children.iter().enumerate() {
        let ChildState::Present {
            reference: child_ref,
            dir: child_dir,
            own: Some(child_settings),
            ..
        } = child
        else {
            continue;
        };
        // A child without its own path is reported above and checked once fixed
        if declared_path(child_settings).is_none() {
            continue;
        }
        let mut child_forbidden = vec![path.clone()];
        child_forbidden.extend(forbidden.iter().cloned());
        if let Some(sibling) = &effective[1 - index] {
            child_forbidden.push(sibling.clone());
        }
        issues.extend(validate_node(
            *child_ref,
            child_dir,
            child_settings,
            &child_forbidden,
        )?);
    }

    Ok(issues)
}

fn declared_path(settings: &Settings) -> Option<String> {
    settings
        .path
        .as_deref()
        .filter(|p| !p.trim().is_empty())
        .map(normalize_document_path)
}

/// What the parent knows about one child slot.
enum ChildState {
    /// No subdirectory; only the parent's pointer (if any) describes it
    Absent {
        reference: Reference,
        pointer: Option<String>,
    },
    /// Subdirectory exists but its settings file is not valid JSON
    Unreadable {
        reference: Reference,
        dir: PathBuf,
        pointer: Option<String>,
        message: String,
    },
    Present {
        reference: Reference,
        dir: PathBuf,
        pointer: Option<String>,
        own: Option<Settings>,
    },
}

impl ChildState {
    fn read(parent_dir: &Path, reference: Reference, parent: &Settings) -> Self {
        let pointer = parent.pointer(reference).map(normalize_document_path);
        let dir = parent_dir.join(reference.dir_name());
        if !dir.is_dir() {
            return ChildState::Absent { reference, pointer };
        }
        match Settings::load_optional(&dir) {
            Ok(own) => ChildState::Present {
                reference,
                dir,
                pointer,
                own,
            },
            Err(e) => ChildState::Unreadable {
                reference,
                dir,
                pointer,
                message: e.to_string(),
            },
        }
    }

    fn reference(&self) -> Reference {
        match self {
            ChildState::Absent { reference, .. }
            | ChildState::Unreadable { reference, .. }
            | ChildState::Present { reference, .. } => *reference,
        }
    }

    /// Path declared in the child's own settings.
    fn own_path(&self) -> Option<String> {
        match self {
            ChildState::Present { own: Some(own), .. } => declared_path(own),
            _ => None,
        }
    }

    /// The path this child resolves to: its own declaration, then the
    /// parent's pointer, then the default path when the directory exists.
    fn effective_path(&self, parent_path: &str) -> Option<String> {
        let default = || default_child_path(parent_path, self.reference().dir_name());
        match self {
            ChildState::Absent { pointer, .. } => pointer.clone(),
            ChildState::Unreadable { pointer, .. } => {
                Some(pointer.clone().unwrap_or_else(default))
            }
            ChildState::Present { pointer, .. } => Some(
                self.own_path()
                    .or_else(|| pointer.clone())
                    .unwrap_or_else(default),
            ),
        }
    }

    fn dir(&self, parent_dir: &Path) -> PathBuf {
        match self {
            ChildState::Absent { reference, .. } => parent_dir.join(reference.dir_name()),
            ChildState::Unreadable { dir, .. } | ChildState::Present { dir, .. } => dir.clone(),
        }
    }
}

/// A child directory as seen from its parent.
struct ChildTarget<'a> {
    reference: Reference,
    dir: &'a Path,
    own: Option<&'a Settings>,
    /// Effective path of the child
    path: Option<&'a str>,
    /// The effective path collides, so no fix may write it
    blocked: bool,
}

fn check_child(
    issues: &mut Vec<Issue>,
    reference: Reference,
    dir: &Path,
    settings: &Settings,
    child: ChildTarget<'_>,
) -> Result<()> {
    let pointer = settings.pointer(child.reference).map(normalize_document_path);
    let own_path = child.own.and_then(declared_path);
    let writable = child.path.filter(|_| !child.blocked).map(str::to_string);

    match child.own {
        None => {
            let issue = Issue::configuration(
                child.reference,
                child.dir,
                format!("{}/ has no settings.json", child.reference.dir_name()),
            );
            issues.push(match &writable {
                Some(path) => issue.with_fix(Fix::CreateSettings {
                    dir: child.dir.to_path_buf(),
                    path: path.clone(),
                    uploads: io::list_files(&DocPath::Uploads.under(child.dir))?,
                }),
                None => issue,
            });
        }
        Some(_) if own_path.is_none() => {
            let issue = Issue::configuration(
                child.reference,
                child.dir,
                format!("{} has no path", Settings::file(child.dir).display()),
            );
            issues.push(match &writable {
                Some(path) => issue.with_fix(Fix::SetPath {
                    dir: child.dir.to_path_buf(),
                    path: path.clone(),
                }),
                None => issue,
            });
        }
        Some(_) => {}
    }

    let pointer_key = child.reference.pointer_key();
    match (&pointer, &own_path) {
        (None, _) => {
            let issue = Issue::configuration(
                reference,
                dir,
                format!(
                    "{}/ exists but {pointer_key} is not set",
                    child.reference.dir_name()
                ),
            );
            let value = own_path.clone().or(writable);
            issues.push(match value {
                Some(value) => issue.with_fix(Fix::SetPointer {
                    dir: dir.to_path_buf(),
                    child: child.reference,
                    value,
                }),
                None => issue,
            });
        }
        (Some(expected), Some(actual)) if expected != actual => {
            issues.push(
                Issue::configuration(
                    reference,
                    dir,
                    format!(
                        "{pointer_key} is {expected} but {}/settings.json declares {actual}",
                        child.reference.dir_name()
                    ),
                )
                .with_fix(Fix::SetPointer {
                    dir: dir.to_path_buf(),
                    child: child.reference,
                    value: actual.clone(),
                }),
            );
        }
        _ => {}
    }

    Ok(())
}

/// Check the children whose path is inherited from the parent (a pointer or
/// the default) rather than declared in their own settings. Recursion never
/// validates those, so their collisions are reported here. Returns which
/// children collide.
fn check_inherited_paths(
    issues: &mut Vec<Issue>,
    dir: &Path,
    path: &str,
    forbidden: &[String],
    children: &[ChildState; 2],
    effective: &[Option<String>; 2],
) -> [bool; 2] {
    let mut blocked = [false; 2];
    for (index, child) in children.iter().enumerate() {
        if child.own_path().is_some() {
            continue;
        }
        let Some(candidate) = &effective[index] else {
            continue;
        };
        let sibling = effective[1 - index].as_ref();
        if candidate == path || forbidden.contains(candidate) || sibling == Some(candidate) {
            blocked[index] = true;
            let reference = child.reference();
            issues.push(Issue::consistency(
                reference,
                &child.dir(dir),
                format!(
                    "{} {candidate} collides with another path in this tree",
                    reference.pointer_key()
                ),
            ));
        }
    }
    blocked
}

fn check_uploads(
    issues: &mut Vec<Issue>,
    reference: Reference,
    dir: &Path,
    settings: &Settings,
) -> Result<()> {
    let actual = io::list_files(&DocPath::Uploads.under(dir))?;
    let mut declared = settings.uploads.clone().unwrap_or_default();
    declared.sort();
    if declared != actual {
        issues.push(
            Issue::configuration(
                reference,
                dir,
                format!("uploads {declared:?} do not match uploads/ contents {actual:?}"),
            )
            .with_fix(Fix::SetUploads {
                dir: dir.to_path_buf(),
                uploads: actual,
            }),
        );
    }
    Ok(())
}
