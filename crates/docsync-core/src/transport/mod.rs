//! Transport primitives
//!
//! A [`Transport`] moves exactly one node of a document tree in one
//! direction. [`detect_transport`] picks between git and archive from the
//! local directory state alone.

mod archive;
mod detect;
mod git;

use async_trait::async_trait;
use docsync_meta::PathContext;
use serde::Serialize;

use crate::Result;
use crate::client::ServerClient;

pub use archive::{
    ArchiveChanges, ArchiveFileSet, ArchiveTransport, archive_file_set, build_archive,
    diff_extracted,
};
pub use detect::{DirState, TransportChoice, TransportKind, detect_transport, probe_dir_state};
pub use git::GitTransport;

/// Result of moving one node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeSync {
    /// Transport that actually ran (git push may fall through to archive)
    pub transport: TransportKind,
    /// Files written locally (pull) or sent (archive push)
    pub changed: Vec<String>,
    /// Path assigned by the server, when it differs from the node's path
    pub server_path: Option<String>,
    /// Pull skipped because of uncommitted local changes
    pub skipped: bool,
}

/// One direction of one node.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn push(&self, node: &PathContext) -> Result<NodeSync>;

    async fn pull(&self, node: &PathContext) -> Result<NodeSync>;
}

/// Both transports bound to one server.
#[derive(Clone)]
pub struct Transports {
    git: GitTransport,
    archive: ArchiveTransport,
}

impl Transports {
    pub fn new(client: ServerClient, track: bool) -> Self {
        let archive = ArchiveTransport::new(client, track);
        Self {
            git: GitTransport::new(archive.clone()),
            archive,
        }
    }

    pub fn get(&self, kind: TransportKind) -> &dyn Transport {
        match kind {
            TransportKind::Git => &self.git,
            TransportKind::Archive => &self.archive,
        }
    }
}
