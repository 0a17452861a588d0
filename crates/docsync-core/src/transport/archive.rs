//! Archive transport: one tar+gzip bundle per node over HTTP

use std::fs;
use std::io::Read;
use std::path::Path;

use async_trait::async_trait;
use docsync_fs::{DocPath, compute_bytes_checksum, compute_file_checksum, io};
use docsync_git::{RepositoryState, is_dirty, probe_repository, record_snapshot};
use docsync_meta::{PathContext, normalize_document_path};
use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use serde::Serialize;

use super::{NodeSync, Transport, TransportKind};
use crate::assemble::{single_content_file, single_data_file};
use crate::client::ServerClient;
use crate::{Error, Result};

/// Files of a directory split into what an archive carries and what it
/// leaves out.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ArchiveFileSet {
    pub included: Vec<String>,
    pub ignored: Vec<String>,
}

/// Classify the top-level files of `dir` for archiving.
///
/// An archive holds exactly one content file and `settings.json`, plus at
/// most one data file and the optional style, script and server files.
pub fn archive_file_set(dir: &Path) -> Result<ArchiveFileSet> {
    let files = io::list_files(dir)?;
    if !files.iter().any(|f| f == DocPath::Settings.as_str()) {
        return Err(Error::InvalidArchive {
            dir: dir.to_path_buf(),
            message: "settings.json is missing".to_string(),
        });
    }

    let mut included = vec![single_content_file(dir, &files)?];
    included.extend(single_data_file(dir, &files)?);
    for fixed in [
        DocPath::Settings,
        DocPath::Style,
        DocPath::Script,
        DocPath::Server,
    ] {
        if files.iter().any(|f| f == fixed.as_str()) {
            included.push(fixed.as_str().to_string());
        }
    }
    included.sort();

    let ignored = files
        .into_iter()
        .filter(|f| !included.contains(f))
        .collect();
    Ok(ArchiveFileSet { included, ignored })
}

/// Build a tar+gzip archive of the archivable files of `dir`.
pub fn build_archive(dir: &Path) -> Result<Vec<u8>> {
    let set = archive_file_set(dir)?;
    let encoder = GzEncoder::new(Vec::new(), Compression::default());
    let mut builder = tar::Builder::new(encoder);
    for name in &set.included {
        builder.append_path_with_name(dir.join(name), name)?;
    }
    let encoder = builder.into_inner()?;
    Ok(encoder.finish()?)
}

/// Unpack `archive` into `dest`. Entries escaping `dest` are rejected by
/// the tar reader.
pub(crate) fn extract_archive(archive: &[u8], dest: &Path) -> Result<()> {
    let mut decoder = GzDecoder::new(archive);
    let mut raw = Vec::new();
    decoder.read_to_end(&mut raw)?;
    tar::Archive::new(raw.as_slice()).unpack(dest)?;
    Ok(())
}

/// Classification of an extracted archive against a local directory.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ArchiveChanges {
    pub new: Vec<String>,
    pub modified: Vec<String>,
    pub unchanged: Vec<String>,
}

impl ArchiveChanges {
    pub fn has_changes(&self) -> bool {
        !self.new.is_empty() || !self.modified.is_empty()
    }

    /// New and modified files, sorted.
    pub fn changed(&self) -> Vec<String> {
        let mut changed: Vec<String> = self.new.iter().chain(&self.modified).cloned().collect();
        changed.sort();
        changed
    }
}

/// Compare every file in `extracted` with its counterpart in `dir` by hash.
pub fn diff_extracted(extracted: &Path, dir: &Path) -> Result<ArchiveChanges> {
    let mut changes = ArchiveChanges::default();
    for name in io::list_files(extracted)? {
        let local = dir.join(&name);
        if !local.is_file() {
            changes.new.push(name);
            continue;
        }
        let incoming = compute_file_checksum(&extracted.join(&name))?;
        if incoming == compute_file_checksum(&local)? {
            changes.unchanged.push(name);
        } else {
            changes.modified.push(name);
        }
    }
    Ok(changes)
}

/// Archive push and pull for one node.
#[derive(Clone)]
pub struct ArchiveTransport {
    client: ServerClient,
    track: bool,
}

impl ArchiveTransport {
    /// `track` commits every applied pull into a local repository.
    pub fn new(client: ServerClient, track: bool) -> Self {
        Self { client, track }
    }

    /// Upload the archive of `node` and return the path the server assigned
    /// when it differs from the node's path.
    async fn upload(&self, node: &PathContext) -> Result<Option<String>> {
        let archive = build_archive(&node.dir)?;
        tracing::debug!(
            path = %node.normalized_path,
            bytes = archive.len(),
            checksum = %compute_bytes_checksum(&archive),
            "Uploading archive"
        );
        let assigned = self
            .client
            .upload_archive(&node.normalized_path, archive)
            .await?
            .map(|p| normalize_document_path(&p))
            .filter(|p| *p != node.normalized_path);
        Ok(assigned)
    }

    async fn fetch(&self, node: &PathContext) -> Result<ArchiveChanges> {
        let state = probe_repository(&node.dir);
        if state.has_remote() {
            return Err(Error::UseGitTransport {
                dir: node.dir.clone(),
            });
        }

        let archive = self.client.download_archive(&node.normalized_path).await?;
        let staging = tempfile::tempdir()?;
        extract_archive(&archive, staging.path())?;
        let changes = diff_extracted(staging.path(), &node.dir)?;
        if !changes.has_changes() {
            tracing::debug!(path = %node.normalized_path, "Archive matches local files");
            return Ok(changes);
        }

        if state == RepositoryState::NoRemote && is_dirty(&node.dir)? {
            return Err(docsync_git::Error::UncommittedChanges {
                dir: node.dir.clone(),
            }
            .into());
        }

        fs::create_dir_all(&node.dir)?;
        let changed = changes.changed();
        for name in &changed {
            let content = fs::read(staging.path().join(name))?;
            io::write_atomic(&node.dir.join(name), &content)?;
        }

        if self.track {
            let message = if state.is_repository() {
                format!("Update {} from server", node.normalized_path)
            } else {
                format!("Import {} from server", node.normalized_path)
            };
            record_snapshot(&node.dir, &changed, &message)?;
        }

        tracing::info!(
            path = %node.normalized_path,
            new = changes.new.len(),
            modified = changes.modified.len(),
            "Applied archive"
        );
        Ok(changes)
    }
}

#[async_trait]
impl Transport for ArchiveTransport {
    async fn push(&self, node: &PathContext) -> Result<NodeSync> {
        let server_path = self.upload(node).await?;
        Ok(NodeSync {
            transport: TransportKind::Archive,
            changed: archive_file_set(&node.dir)?.included,
            server_path,
            skipped: false,
        })
    }

    async fn pull(&self, node: &PathContext) -> Result<NodeSync> {
        let changes = self.fetch(node).await?;
        Ok(NodeSync {
            transport: TransportKind::Archive,
            changed: changes.changed(),
            server_path: None,
            skipped: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docsync_test_utils::document::TestDocument;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn file_set_separates_ignored_files() {
        let doc = TestDocument::minimal("/a");
        doc.write("style.css", "")
            .write("data.json", "{}")
            .write("notes.txt", "")
            .write("uploads/logo.png", "png")
            .write(".hidden", "");

        let set = archive_file_set(doc.root()).unwrap();
        assert_eq!(
            set.included,
            vec!["content.md", "data.json", "settings.json", "style.css"]
        );
        assert_eq!(set.ignored, vec!["notes.txt"]);
    }

    #[test]
    fn file_set_requires_settings() {
        let doc = TestDocument::new();
        doc.write("content.md", "x");

        let err = archive_file_set(doc.root()).unwrap_err();
        assert!(matches!(err, Error::InvalidArchive { .. }));
    }

    #[test]
    fn file_set_requires_single_content() {
        let doc = TestDocument::minimal("/a");
        doc.write("index.html", "<p></p>");

        let err = archive_file_set(doc.root()).unwrap_err();
        assert!(matches!(err, Error::ContentAmbiguous { .. }));
    }

    #[test]
    fn extracted_archive_classifies_against_local() {
        let source = TestDocument::minimal("/a");
        source.write("style.css", "body {}");
        let archive = build_archive(source.root()).unwrap();

        let staging = TempDir::new().unwrap();
        extract_archive(&archive, staging.path()).unwrap();

        let local = TestDocument::minimal("/a");
        local.write("content.md", "# Edited");
        let changes = diff_extracted(staging.path(), local.root()).unwrap();

        assert_eq!(changes.new, vec!["style.css"]);
        assert_eq!(changes.modified, vec!["content.md"]);
        assert_eq!(changes.unchanged, vec!["settings.json"]);
        assert_eq!(changes.changed(), vec!["content.md", "style.css"]);
    }
}
