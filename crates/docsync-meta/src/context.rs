//! Path contexts: one node of a document tree for one operation
//!
//! A document tree has at most three nodes. The root lives in the document
//! directory itself; the template and slot documents live in its `template/`
//! and `slot/` subdirectories.

use std::fmt;
use std::path::{Path, PathBuf};

use docsync_fs::{DocPath, io};

use crate::config::{Credentials, Target};
use crate::path::{document_base, normalize_document_path};
use crate::settings::Settings;
use crate::Result;

/// Role of a node in a document tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reference {
    Root,
    Template,
    Slot,
}

impl Reference {
    /// Both child references, template first.
    pub const CHILDREN: [Reference; 2] = [Reference::Template, Reference::Slot];

    /// Directory name of this node below the root, empty for the root.
    pub fn dir_name(&self) -> &'static str {
        match self {
            Reference::Root => "",
            Reference::Template => DocPath::Template.as_str(),
            Reference::Slot => DocPath::Slot.as_str(),
        }
    }

    /// Name of the settings key pointing at this node from the root.
    pub fn pointer_key(&self) -> &'static str {
        match self {
            Reference::Root => "path",
            Reference::Template => "template_path",
            Reference::Slot => "slot_path",
        }
    }

    /// The other child reference. The root has no sibling.
    pub fn sibling(&self) -> Option<Reference> {
        match self {
            Reference::Root => None,
            Reference::Template => Some(Reference::Slot),
            Reference::Slot => Some(Reference::Template),
        }
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reference::Root => write!(f, "root"),
            Reference::Template => write!(f, "template"),
            Reference::Slot => write!(f, "slot"),
        }
    }
}

/// One node of a document tree, built fresh for each command invocation.
#[derive(Debug, Clone)]
pub struct PathContext {
    pub reference: Reference,
    /// Document path as given
    pub path: String,
    /// Document path after [`normalize_document_path`]
    pub normalized_path: String,
    pub server_url: String,
    pub credentials: Credentials,
    /// Settings read from `dir`, if the directory has any yet
    pub settings: Option<Settings>,
    pub dir: PathBuf,
    pub absolute_dir: PathBuf,
    /// Paths of ancestors and siblings this node's path must differ from
    pub forbidden_paths: Vec<String>,
}

impl PathContext {
    /// Build the root node for `target`, located at `dir`.
    pub fn root(target: &Target, dir: &Path) -> Result<Self> {
        Self::build(
            Reference::Root,
            &target.path,
            &target.server_url,
            target.credentials.clone(),
            dir.to_path_buf(),
            Vec::new(),
        )
    }

    /// Build a template or slot node below this node.
    ///
    /// The child's forbidden set is this node's forbidden set plus this
    /// node's own path.
    pub fn child(&self, reference: Reference, path: &str) -> Result<Self> {
        let mut forbidden = self.forbidden_paths.clone();
        forbidden.push(self.normalized_path.clone());
        Self::build(
            reference,
            path,
            &self.server_url,
            self.credentials.clone(),
            self.dir.join(reference.dir_name()),
            forbidden,
        )
    }

    /// Build the template and slot nodes this node's settings point at,
    /// template first.
    ///
    /// Each child also forbids the path its sibling is pointed at.
    pub fn children(&self) -> Result<Vec<Self>> {
        let Some(settings) = &self.settings else {
            return Ok(Vec::new());
        };
        let mut children = Vec::new();
        for reference in Reference::CHILDREN {
            let Some(pointer) = settings.pointer(reference) else {
                continue;
            };
            let mut child = self.child(reference, pointer)?;
            if let Some(sibling) = reference.sibling().and_then(|s| settings.pointer(s)) {
                child.forbidden_paths.push(normalize_document_path(sibling));
            }
            children.push(child);
        }
        Ok(children)
    }

    /// True when this node's path equals an ancestor's or its sibling's.
    pub fn collides(&self) -> bool {
        self.forbidden_paths.contains(&self.normalized_path)
    }

    fn build(
        reference: Reference,
        path: &str,
        server_url: &str,
        credentials: Credentials,
        dir: PathBuf,
        forbidden_paths: Vec<String>,
    ) -> Result<Self> {
        let settings = Settings::load_optional(&dir)?;
        let absolute_dir = io::absolute(&dir)?;
        Ok(Self {
            reference,
            path: path.to_string(),
            normalized_path: normalize_document_path(path),
            server_url: server_url.to_string(),
            credentials,
            settings,
            dir,
            absolute_dir,
            forbidden_paths,
        })
    }

    /// Re-read `settings.json` after the directory changed on disk.
    pub fn reload_settings(&mut self) -> Result<()> {
        self.settings = Settings::load_optional(&self.dir)?;
        Ok(())
    }

    /// Adopt a new document path, e.g. one assigned by the server.
    pub fn set_path(&mut self, path: &str) {
        self.path = path.to_string();
        self.normalized_path = normalize_document_path(path);
    }

    /// Public URL of this document.
    pub fn document_url(&self) -> String {
        document_base(&self.server_url, &self.normalized_path)
    }

    /// Credential-free URL of this document's remote repository.
    pub fn remote_url(&self) -> String {
        format!(
            "{}{}.git",
            self.server_url.trim_end_matches('/'),
            self.normalized_path
        )
    }

    /// Local `uploads/` directory of this node.
    pub fn uploads_dir(&self) -> PathBuf {
        docsync_fs::DocPath::Uploads.under(&self.dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use tempfile::TempDir;

    fn target() -> Target {
        Target::new(
            "https://docs.example.com/",
            Credentials::new("u", "p"),
            "/blog/post/",
        )
    }

    #[test]
    fn root_context_urls() {
        let temp = TempDir::new().unwrap();
        let ctx = PathContext::root(&target(), temp.path()).unwrap();

        assert_eq!(ctx.normalized_path, "/blog/post");
        assert_eq!(ctx.document_url(), "https://docs.example.com/blog/post");
        assert_eq!(ctx.remote_url(), "https://docs.example.com/blog/post.git");
        assert!(ctx.absolute_dir.is_absolute());
        assert!(ctx.settings.is_none());
    }

    #[test]
    fn child_context_extends_forbidden_paths() {
        let temp = TempDir::new().unwrap();
        let root = PathContext::root(&target(), temp.path()).unwrap();
        let template = root.child(Reference::Template, "/blog/layout").unwrap();

        assert_eq!(template.reference, Reference::Template);
        assert_eq!(template.dir, temp.path().join("template"));
        assert_eq!(template.forbidden_paths, vec!["/blog/post".to_string()]);
        assert_eq!(template.server_url, root.server_url);
    }

    #[test]
    fn reload_picks_up_new_settings() {
        let temp = TempDir::new().unwrap();
        let mut ctx = PathContext::root(&target(), temp.path()).unwrap();
        Settings::with_path("/blog/post").save(temp.path()).unwrap();

        ctx.reload_settings().unwrap();
        assert_eq!(
            ctx.settings.unwrap().path.as_deref(),
            Some("/blog/post")
        );
    }

    #[test]
    fn children_forbid_each_other() {
        let temp = TempDir::new().unwrap();
        let mut settings = Settings::with_path("/blog/post");
        settings.set_pointer(Reference::Template, Some("/layout".into()));
        settings.set_pointer(Reference::Slot, Some("/nav/".into()));
        settings.save(temp.path()).unwrap();
        let root = PathContext::root(&target(), temp.path()).unwrap();

        let children = root.children().unwrap();
        let references: Vec<_> = children.iter().map(|c| c.reference).collect();
        assert_eq!(references, vec![Reference::Template, Reference::Slot]);
        assert_eq!(
            children[0].forbidden_paths,
            vec!["/blog/post".to_string(), "/nav".to_string()]
        );
        assert_eq!(
            children[1].forbidden_paths,
            vec!["/blog/post".to_string(), "/layout".to_string()]
        );
        assert!(children.iter().all(|c| !c.collides()));
    }

    #[rstest]
    #[case::same_as_root("/blog/post/", "/nav")]
    #[case::same_as_sibling("/nav", "/nav")]
    fn colliding_child_is_detected(#[case] template: &str, #[case] slot: &str) {
        let temp = TempDir::new().unwrap();
        let mut settings = Settings::with_path("/blog/post");
        settings.set_pointer(Reference::Template, Some(template.into()));
        settings.set_pointer(Reference::Slot, Some(slot.into()));
        settings.save(temp.path()).unwrap();
        let root = PathContext::root(&target(), temp.path()).unwrap();

        let children = root.children().unwrap();
        assert!(children[0].collides());
    }

    #[test]
    fn root_without_settings_has_no_children() {
        let temp = TempDir::new().unwrap();
        let root = PathContext::root(&target(), temp.path()).unwrap();
        assert!(root.children().unwrap().is_empty());
    }
}
