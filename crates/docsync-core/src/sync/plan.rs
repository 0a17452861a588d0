//! Pre-push upload plans for archive nodes

use std::collections::BTreeMap;
use std::path::PathBuf;

use docsync_fs::{compute_file_checksum, io};
use docsync_meta::{PathContext, Reference};
use futures::future::try_join_all;

use crate::Result;
use crate::client::ServerClient;
use crate::transport::archive_file_set;

/// What an archive push of one node will send and change.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadPlan {
    pub reference: Reference,
    pub path: String,
    pub dir: PathBuf,
    /// The server already has a document at `path`
    pub exists_on_server: bool,
    /// Files packed into the archive
    pub included: Vec<String>,
    /// Top-level files left out of the archive
    pub ignored: Vec<String>,
    /// Assets identical on both sides
    pub synced: Vec<String>,
    /// Assets to upload
    pub add_assets: Vec<String>,
    /// Server assets to delete
    pub remove_assets: Vec<String>,
}

/// Build one plan per node. Server state for all nodes is fetched
/// concurrently; the requests are read-only.
pub async fn build_upload_plan(
    client: &ServerClient,
    nodes: &[&PathContext],
) -> Result<Vec<UploadPlan>> {
    // Local problems surface before any request goes out
    let file_sets = nodes
        .iter()
        .map(|node| archive_file_set(&node.dir))
        .collect::<Result<Vec<_>>>()?;

    let remote = try_join_all(nodes.iter().map(|node| async move {
        futures::try_join!(
            client.fetch_settings(&node.normalized_path),
            client.fetch_manifest(&node.normalized_path)
        )
    }))
    .await?;

    let mut plans = Vec::with_capacity(nodes.len());
    for ((node, set), (settings, manifest)) in nodes.iter().zip(file_sets).zip(remote) {
        let server: BTreeMap<String, String> =
            manifest.into_iter().map(|a| (a.name, a.hash)).collect();
        let uploads_dir = node.uploads_dir();
        let local = io::list_files(&uploads_dir)?;

        let mut plan = UploadPlan {
            reference: node.reference,
            path: node.normalized_path.clone(),
            dir: node.dir.clone(),
            exists_on_server: settings.is_some(),
            included: set.included,
            ignored: set.ignored,
            synced: Vec::new(),
            add_assets: Vec::new(),
            remove_assets: server
                .keys()
                .filter(|name| !local.contains(name))
                .cloned()
                .collect(),
        };
        for name in local {
            let hash = compute_file_checksum(&uploads_dir.join(&name))?;
            if server.get(&name) == Some(&hash) {
                plan.synced.push(name);
            } else {
                plan.add_assets.push(name);
            }
        }
        plans.push(plan);
    }
    Ok(plans)
}
