//! Error types for docsync-core

use std::path::PathBuf;

/// Result type for docsync-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in docsync-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No `content.*` or `index.html` file in a document directory
    #[error("No content file in {dir}; add one content.<ext> or index.html")]
    ContentMissing { dir: PathBuf },

    /// More than one content file in a document directory
    #[error("Ambiguous content in {dir}: {files:?}; keep exactly one")]
    ContentAmbiguous { dir: PathBuf, files: Vec<String> },

    /// More than one `data.*` file in a document directory
    #[error("Ambiguous data in {dir}: {files:?}; keep at most one")]
    DataAmbiguous { dir: PathBuf, files: Vec<String> },

    /// A node's settings have no `path`
    #[error("Document at {dir} has no path in settings.json")]
    MissingPath { dir: PathBuf },

    /// A template/slot directory exists that settings do not declare
    #[error("{dir} exists but settings.json has no {key}; run `docsync fix`")]
    UndeclaredSubdocument { dir: PathBuf, key: String },

    /// A template/slot document directory could not be found
    #[error("Document directory not found for {path} (expected {dir})")]
    DirectoryNotFound { path: String, dir: PathBuf },

    /// A local sub-document declares a different path than its parent expects
    #[error("Path mismatch in {dir}: expected {expected}, found {actual}")]
    PathMismatch {
        dir: PathBuf,
        expected: String,
        actual: String,
    },

    /// A node's path collides with an ancestor's or sibling's path
    #[error("Path collision in {dir}: {message}")]
    PathCollision { dir: PathBuf, message: String },

    /// A directory cannot be packed into an archive
    #[error("Invalid archive contents in {dir}: {message}")]
    InvalidArchive { dir: PathBuf, message: String },

    /// Archive transport refused on a git-tracked directory
    #[error("{dir} is tracked through git; use the git transport instead")]
    UseGitTransport { dir: PathBuf },

    /// Non-2xx response from the server
    #[error("{method} {url} failed with status {status}")]
    Http {
        method: String,
        url: String,
        status: u16,
    },

    /// An asset name that is not a single file name
    #[error("Invalid asset name: {name:?}")]
    InvalidAssetName { name: String },

    /// The user declined a confirmation prompt
    #[error("Aborted by user")]
    Aborted,

    /// Push stage failure
    #[error("push failed: {source}")]
    PushFailed {
        #[source]
        source: Box<Error>,
    },

    /// Pull stage failure
    #[error("pull failed: {source}")]
    PullFailed {
        #[source]
        source: Box<Error>,
    },

    /// Cache population failure
    #[error("cache population failed: {message}")]
    CachePopulation { message: String },

    // Transparent wrappers for underlying crate errors
    /// Filesystem error from docsync-fs
    #[error(transparent)]
    Fs(#[from] docsync_fs::Error),

    /// Metadata error from docsync-meta
    #[error(transparent)]
    Meta(#[from] docsync_meta::Error),

    /// Git error from docsync-git
    #[error(transparent)]
    Git(#[from] docsync_git::Error),

    /// Transport-level HTTP error
    #[error(transparent)]
    Request(#[from] reqwest::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn push_failed(source: Error) -> Self {
        match source {
            already @ Error::PushFailed { .. } => already,
            other => Error::PushFailed {
                source: Box::new(other),
            },
        }
    }

    pub(crate) fn pull_failed(source: Error) -> Self {
        match source {
            already @ Error::PullFailed { .. } => already,
            other => Error::PullFailed {
                source: Box::new(other),
            },
        }
    }
}
