//! The `settings.json` of a document directory

use std::path::{Path, PathBuf};

use docsync_fs::{ConfigStore, DocPath};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::context::Reference;
use crate::{Error, Result};

/// Persisted per-directory document settings.
///
/// Keys this crate does not model are kept in `extra` and written back
/// unchanged, so a rewrite after a fix never drops server-managed fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Canonical absolute document path
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Path of the composed template document
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_path: Option<String>,

    /// Path of the composed slot document
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slot_path: Option<String>,

    /// Filenames expected in the local `uploads/` directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uploads: Option<Vec<String>>,

    /// Output extension override (e.g. `.html`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Settings {
    /// Settings declaring only a document path.
    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            ..Default::default()
        }
    }

    /// Location of the settings file inside `dir`.
    pub fn file(dir: &Path) -> PathBuf {
        DocPath::Settings.under(dir)
    }

    /// Load the settings of the document directory `dir`.
    pub fn load(dir: &Path) -> Result<Self> {
        let file = Self::file(dir);
        if !file.is_file() {
            return Err(Error::SettingsNotFound { path: file });
        }
        Ok(ConfigStore::new().load(&file)?)
    }

    /// Load the settings of `dir`, or `None` when it has no settings file.
    pub fn load_optional(dir: &Path) -> Result<Option<Self>> {
        match Self::load(dir) {
            Ok(settings) => Ok(Some(settings)),
            Err(Error::SettingsNotFound { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Write these settings to `dir/settings.json` atomically.
    pub fn save(&self, dir: &Path) -> Result<()> {
        Ok(ConfigStore::new().save(&Self::file(dir), self)?)
    }

    /// The declared path, or an error naming `dir` when absent.
    pub fn require_path(&self, dir: &Path) -> Result<&str> {
        self.path
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .ok_or_else(|| Error::MissingPath {
                dir: dir.to_path_buf(),
            })
    }

    /// The pointer to a child document (`template_path` or `slot_path`).
    ///
    /// The root reference has no pointer.
    pub fn pointer(&self, child: Reference) -> Option<&str> {
        match child {
            Reference::Template => self.template_path.as_deref(),
            Reference::Slot => self.slot_path.as_deref(),
            Reference::Root => None,
        }
    }

    /// Set the pointer to a child document. Ignored for the root reference.
    pub fn set_pointer(&mut self, child: Reference, value: Option<String>) {
        match child {
            Reference::Template => self.template_path = value,
            Reference::Slot => self.slot_path = value,
            Reference::Root => {}
        }
    }
}
