//! Git transport: push and pull one node through its repository remote

use async_trait::async_trait;
use docsync_git::{
    PullOutcome, clone_with_credentials, probe_repository, pull_with_credentials,
    push_with_credentials,
};
use docsync_meta::PathContext;

use super::archive::ArchiveTransport;
use super::{NodeSync, Transport, TransportKind};
use crate::Result;

/// Git push/pull. Pushing a directory that is not a repository with a
/// remote falls through to the archive transport.
#[derive(Clone)]
pub struct GitTransport {
    archive: ArchiveTransport,
}

impl GitTransport {
    pub fn new(archive: ArchiveTransport) -> Self {
        Self { archive }
    }
}

#[async_trait]
impl Transport for GitTransport {
    async fn push(&self, node: &PathContext) -> Result<NodeSync> {
        if !probe_repository(&node.dir).has_remote() {
            tracing::info!(
                dir = %node.dir.display(),
                "No repository with a remote, pushing as archive"
            );
            return self.archive.push(node).await;
        }

        let outcome = push_with_credentials(&node.dir, &node.credentials)?;
        tracing::debug!(path = %node.normalized_path, ?outcome, "Git push finished");
        Ok(NodeSync {
            transport: TransportKind::Git,
            changed: Vec::new(),
            server_path: None,
            skipped: false,
        })
    }

    async fn pull(&self, node: &PathContext) -> Result<NodeSync> {
        let remote_url = node.remote_url();
        let outcome = if probe_repository(&node.dir).is_repository() {
            pull_with_credentials(&node.dir, &remote_url, &node.credentials)?
        } else {
            clone_with_credentials(&remote_url, &node.dir, &node.credentials)?
        };

        Ok(NodeSync {
            transport: TransportKind::Git,
            changed: Vec::new(),
            server_path: None,
            skipped: outcome == PullOutcome::SkippedDirty,
        })
    }
}
