//! Collaborators the sync harness calls out to

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use docsync_meta::Target;

use super::plan::UploadPlan;
use crate::assemble::{AssembleOptions, assemble};
use crate::client::ServerClient;
use crate::{Error, Result};

/// Asks whether an archive push should go ahead.
pub trait Confirm: Send + Sync {
    fn confirm(&self, plans: &[UploadPlan]) -> Result<bool>;
}

/// Confirms every plan without asking.
pub struct AutoConfirm;

impl Confirm for AutoConfirm {
    fn confirm(&self, _plans: &[UploadPlan]) -> Result<bool> {
        Ok(true)
    }
}

/// Warms the server's render cache once a sync finished.
#[async_trait]
pub trait CachePopulator: Send + Sync {
    async fn populate(&self, target: &Target, dir: Option<&Path>) -> Result<()>;
}

/// Assembles the local document (when a directory is given) and requests
/// the rendered document once.
pub struct HttpWarmup {
    client: ServerClient,
}

impl HttpWarmup {
    pub fn new(client: ServerClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CachePopulator for HttpWarmup {
    async fn populate(&self, target: &Target, dir: Option<&Path>) -> Result<()> {
        if let Some(dir) = dir {
            let skip_missing = |_: &str| -> Option<PathBuf> { None };
            assemble(dir, AssembleOptions::with_resolver(&skip_missing)).map_err(|e| {
                Error::CachePopulation {
                    message: e.to_string(),
                }
            })?;
        }
        self.client
            .fetch_document(&target.path)
            .await
            .map_err(|e| Error::CachePopulation {
                message: e.to_string(),
            })?;
        tracing::debug!(url = %target.document_url(), "Cache populated");
        Ok(())
    }
}

/// Skips cache population entirely.
pub struct NoWarmup;

#[async_trait]
impl CachePopulator for NoWarmup {
    async fn populate(&self, _target: &Target, _dir: Option<&Path>) -> Result<()> {
        Ok(())
    }
}
