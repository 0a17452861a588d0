//! Document and target detection
//!
//! Commands work from anywhere inside a document tree: the root document is
//! found by walking up from the working directory, the way git finds its
//! repository.

use std::path::{Path, PathBuf};

use docsync_meta::{Credentials, Reference, Settings, Target, TargetsFile};

use crate::cli::RemoteArgs;
use crate::error::{CliError, Result};

/// Find the root document enclosing `start`.
///
/// The nearest directory holding `settings.json` wins, unless it is the
/// `template/` or `slot/` directory of another document, in which case the
/// search continues with that document.
pub fn find_document_root(start: &Path) -> Option<PathBuf> {
    let mut dir = start.ancestors().find(|d| Settings::file(d).is_file())?;
    while let Some(parent) = enclosing_document(dir) {
        dir = parent;
    }
    Some(dir.to_path_buf())
}

/// The parent document when `dir` is one of its template or slot directories.
fn enclosing_document(dir: &Path) -> Option<&Path> {
    let name = dir.file_name()?.to_str()?;
    let is_child_dir = Reference::CHILDREN.iter().any(|r| r.dir_name() == name);
    let parent = dir.parent()?;
    (is_child_dir && Settings::file(parent).is_file()).then_some(parent)
}

/// The document directory a command operates on: `explicit` when given
/// (relative to `cwd`), otherwise the enclosing document.
pub fn document_dir(cwd: &Path, explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(dir) = explicit {
        return Ok(cwd.join(dir));
    }
    find_document_root(cwd).ok_or_else(|| {
        CliError::user(format!(
            "No document found at {} or any parent directory (no settings.json)",
            cwd.display()
        ))
    })
}

/// Build the sync target from the targets file and command-line overrides.
///
/// The targets file is only consulted when a target is named or no server
/// was given on the command line.
pub fn resolve_target(args: &RemoteArgs, path: &str) -> Result<Target> {
    let configured = if args.server.is_none() || args.target.is_some() {
        let location = TargetsFile::default_location().ok_or_else(|| {
            CliError::user("Cannot locate targets.toml; pass --server or set DOCSYNC_CONFIG")
        })?;
        let file = TargetsFile::load(&location)?;
        Some(file.resolve(args.target.as_deref())?.clone())
    } else {
        None
    };

    let mut credentials = configured
        .as_ref()
        .map(|c| c.credentials())
        .unwrap_or_default();
    if let Some(username) = &args.username {
        credentials.username = username.clone();
    }
    if let Some(password) = &args.password {
        credentials.password = password.clone();
    }

    let server_url = match (&args.server, configured) {
        (Some(server), _) => server.clone(),
        (None, Some(config)) => config.server_url,
        (None, None) => return Err(CliError::user("No server given")),
    };
    tracing::debug!(server = %server_url, username = %credentials.username, path, "Resolved target");

    Ok(Target::new(server_url, credentials, path))
}

/// Credentials-free description of a target for messages.
pub fn describe(target: &Target) -> String {
    let Credentials { username, .. } = &target.credentials;
    if username.is_empty() {
        target.document_url()
    } else {
        format!("{} as {}", target.document_url(), username)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docsync_core::TransportChoice;
    use docsync_test_utils::document::TestDocument;
    use serde_json::json;

    fn remote(server: Option<&str>) -> RemoteArgs {
        RemoteArgs {
            target: None,
            server: server.map(String::from),
            username: Some("editor".into()),
            password: Some("secret".into()),
            path: None,
            dir: None,
            transport: TransportChoice::Auto,
        }
    }

    #[test]
    fn finds_root_from_nested_directory() {
        let doc = TestDocument::minimal("/blog");
        doc.mkdir("assets/img");

        let found = find_document_root(&doc.dir("assets/img"));
        assert_eq!(found.as_deref(), Some(doc.root()));
    }

    #[test]
    fn template_directory_resolves_to_its_parent() {
        let doc = TestDocument::minimal("/blog");
        doc.settings("", json!({"path": "/blog", "template_path": "/layout"}))
            .settings("template", json!({"path": "/layout"}))
            .mkdir("template/uploads");

        let found = find_document_root(&doc.dir("template/uploads"));
        assert_eq!(found.as_deref(), Some(doc.root()));
    }

    #[test]
    fn directory_named_template_without_parent_document_is_a_root() {
        let doc = TestDocument::new();
        doc.settings("template", json!({"path": "/layout"}));

        let found = find_document_root(&doc.dir("template"));
        assert_eq!(found, Some(doc.dir("template")));
    }

    #[test]
    fn no_document_is_reported() {
        let doc = TestDocument::new();
        let err = document_dir(doc.root(), None).unwrap_err();
        assert!(err.to_string().contains("No document found"));
    }

    #[test]
    fn explicit_dir_is_relative_to_cwd() {
        let doc = TestDocument::new();
        let dir = document_dir(doc.root(), Some(Path::new("blog"))).unwrap();
        assert_eq!(dir, doc.root().join("blog"));
    }

    #[test]
    fn server_flag_skips_targets_file() {
        let target = resolve_target(&remote(Some("https://docs.example.com/")), "blog").unwrap();
        assert_eq!(target.server_url, "https://docs.example.com/");
        assert_eq!(target.path, "/blog");
        assert_eq!(target.credentials, Credentials::new("editor", "secret"));
        assert_eq!(describe(&target), "https://docs.example.com/blog as editor");
    }
}
