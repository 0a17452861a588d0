//! Push and pull orchestration
//!
//! A sync runs node by node: push sends template and slot before the root
//! that references them, pull fetches the root first because only its
//! settings name the template and slot. Asset passes follow once every node
//! has been moved. A failed node aborts the whole sync; a failed asset does
//! not.

mod collab;
mod plan;
mod pull;
mod push;

use std::path::{Path, PathBuf};

use docsync_meta::{PathContext, Reference, Settings, Target, normalize_document_path};
use serde::Serialize;

use crate::Result;
use crate::assets::AssetReport;
use crate::client::ServerClient;
use crate::transport::{TransportChoice, TransportKind};

pub use collab::{AutoConfirm, CachePopulator, Confirm, HttpWarmup, NoWarmup};
pub use plan::{UploadPlan, build_upload_plan};
pub use pull::pull;
pub use push::push;

/// Everything one sync invocation needs, built once and passed down.
pub struct SyncContext {
    pub target: Target,
    /// Local directory of the root node
    pub dir: PathBuf,
    pub client: ServerClient,
    pub confirm: Box<dyn Confirm>,
    pub populator: Box<dyn CachePopulator>,
}

impl SyncContext {
    /// A context that confirms automatically and warms the cache over HTTP.
    pub fn new(target: Target, dir: impl Into<PathBuf>) -> Self {
        let client = ServerClient::new(&target.server_url, &target.credentials);
        Self {
            populator: Box::new(HttpWarmup::new(client.clone())),
            confirm: Box::new(AutoConfirm),
            client,
            target,
            dir: dir.into(),
        }
    }

    pub fn with_confirm(mut self, confirm: Box<dyn Confirm>) -> Self {
        self.confirm = confirm;
        self
    }

    pub fn with_populator(mut self, populator: Box<dyn CachePopulator>) -> Self {
        self.populator = populator;
        self
    }

    fn root_node(&self) -> Result<PathContext> {
        Ok(PathContext::root(&self.target, &self.dir)?)
    }
}

/// The document path to sync: `explicit` when given, otherwise the path in
/// the settings of `dir`.
pub fn resolve_document_path(explicit: Option<&str>, dir: &Path) -> Result<String> {
    if let Some(path) = explicit {
        return Ok(normalize_document_path(path));
    }
    let settings = Settings::load(dir)?;
    Ok(normalize_document_path(settings.require_path(dir)?))
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PushOptions {
    pub transport: TransportChoice,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PullOptions {
    pub transport: TransportChoice,
    /// Commit archive pulls into a local repository
    pub track: bool,
}

/// What happened to one node.
#[derive(Debug, Clone, Serialize)]
pub struct NodeReport {
    #[serde(serialize_with = "serialize_reference")]
    pub reference: Reference,
    pub path: String,
    pub transport: TransportKind,
    pub changed: Vec<String>,
    /// Pull skipped because of uncommitted local changes
    pub skipped: bool,
    pub assets: AssetReport,
}

#[derive(Debug, Clone, Serialize)]
pub struct PushReport {
    /// Nodes in push order
    pub nodes: Vec<NodeReport>,
    pub url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PullReport {
    /// Nodes in pull order
    pub nodes: Vec<NodeReport>,
    pub url: String,
}

fn serialize_reference<S: serde::Serializer>(
    reference: &Reference,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_str(reference)
}
