//! Error types for docsync-meta

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Filesystem error: {0}")]
    Fs(#[from] docsync_fs::Error),

    #[error("Settings not found at {path}")]
    SettingsNotFound { path: PathBuf },

    #[error("Configuration not found at {path}")]
    ConfigNotFound { path: PathBuf },

    #[error("Target not found: {name}")]
    TargetNotFound { name: String },

    #[error("No target given and no default target configured")]
    NoDefaultTarget,

    #[error("Document at {dir} has no path in settings.json")]
    MissingPath { dir: PathBuf },
}
