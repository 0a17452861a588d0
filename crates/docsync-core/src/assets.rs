//! Upload (asset) synchronization
//!
//! Three independent passes per node, each comparing `sha256:<hex>` hashes:
//! [`download`] reacts to the server manifest, [`upload`] to the local
//! `uploads/` directory, and [`delete`] removes server assets that no longer
//! exist locally. A failed transfer of one asset is logged and recorded in
//! the [`AssetReport`]; it never stops the other assets.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use docsync_fs::{compute_bytes_checksum, compute_file_checksum, io};
use docsync_meta::PathContext;
use serde::Serialize;

use crate::client::{RemoteAsset, ServerClient};
use crate::{Error, Result};

/// One asset that could not be transferred.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssetFailure {
    pub name: String,
    pub message: String,
}

/// Outcome of one asset pass over one node.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AssetReport {
    /// Assets downloaded, uploaded or deleted
    pub transferred: Vec<String>,
    /// Assets already identical on both sides
    pub unchanged: Vec<String>,
    pub failed: Vec<AssetFailure>,
}

impl AssetReport {
    fn record(&mut self, name: &str, result: Result<()>) {
        match result {
            Ok(()) => self.transferred.push(name.to_string()),
            Err(e) => {
                tracing::warn!(asset = %name, error = %e, "Asset transfer failed");
                self.failed.push(AssetFailure {
                    name: name.to_string(),
                    message: e.to_string(),
                });
            }
        }
    }

    pub fn merge(&mut self, other: AssetReport) {
        self.transferred.extend(other.transferred);
        self.unchanged.extend(other.unchanged);
        self.failed.extend(other.failed);
    }
}

/// Download server assets that are missing or differ locally.
///
/// When the node has no `uploads/` directory yet, the manifest is not
/// fetched: every upload the node's settings declare is downloaded.
pub async fn download(client: &ServerClient, node: &PathContext) -> Result<AssetReport> {
    let dir = node.uploads_dir();
    let mut report = AssetReport::default();

    if !dir.is_dir() {
        let declared = node
            .settings
            .as_ref()
            .and_then(|s| s.uploads.clone())
            .unwrap_or_default();
        for name in declared {
            let result = fetch_one(client, node, &dir, &name).await;
            report.record(&name, result);
        }
        return Ok(report);
    }

    for asset in client.fetch_manifest(&node.normalized_path).await? {
        let local = dir.join(&asset.name);
        if local.is_file() && compute_file_checksum(&local)? == asset.hash {
            report.unchanged.push(asset.name);
            continue;
        }
        let result = fetch_one(client, node, &dir, &asset.name).await;
        report.record(&asset.name, result);
    }
    Ok(report)
}

/// Upload local assets that are missing or differ on the server.
pub async fn upload(client: &ServerClient, node: &PathContext) -> Result<AssetReport> {
    let dir = node.uploads_dir();
    let mut report = AssetReport::default();
    let local = io::list_files(&dir)?;
    if local.is_empty() {
        return Ok(report);
    }

    let remote = manifest_by_name(client.fetch_manifest(&node.normalized_path).await?);
    for name in local {
        let content = fs::read(dir.join(&name))?;
        if remote.get(&name) == Some(&compute_bytes_checksum(&content)) {
            report.unchanged.push(name);
            continue;
        }
        let result = client
            .upload_asset(&node.normalized_path, &name, content)
            .await;
        report.record(&name, result);
    }
    Ok(report)
}

/// Delete server assets that no longer exist in the local `uploads/`.
pub async fn delete(client: &ServerClient, node: &PathContext) -> Result<AssetReport> {
    let local = io::list_files(&node.uploads_dir())?;
    let mut report = AssetReport::default();

    for asset in client.fetch_manifest(&node.normalized_path).await? {
        if local.contains(&asset.name) {
            continue;
        }
        let result = client
            .delete_asset(&node.normalized_path, &asset.name)
            .await;
        report.record(&asset.name, result);
    }
    Ok(report)
}

fn manifest_by_name(manifest: Vec<RemoteAsset>) -> BTreeMap<String, String> {
    manifest.into_iter().map(|a| (a.name, a.hash)).collect()
}

async fn fetch_one(
    client: &ServerClient,
    node: &PathContext,
    dir: &Path,
    name: &str,
) -> Result<()> {
    if !is_plain_name(name) {
        return Err(Error::InvalidAssetName {
            name: name.to_string(),
        });
    }
    let content = client.download_asset(&node.normalized_path, name).await?;
    io::write_atomic(&dir.join(name), &content)?;
    Ok(())
}

/// Asset names are single path components.
fn is_plain_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains('/')
        && !name.contains('\\')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_names_with_separators() {
        assert!(is_plain_name("logo.png"));
        assert!(!is_plain_name("../settings.json"));
        assert!(!is_plain_name("a/b.png"));
        assert!(!is_plain_name(".."));
        assert!(!is_plain_name(""));
    }

    #[test]
    fn failures_are_recorded_not_raised() {
        let mut report = AssetReport::default();
        report.record("a.png", Ok(()));
        report.record("b.png", Err(Error::Aborted));

        assert_eq!(report.transferred, vec!["a.png"]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].name, "b.png");
    }
}
