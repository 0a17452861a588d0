//! Error types for docsync-git

use std::path::PathBuf;

/// Result type for docsync-git operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in docsync-git operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("Filesystem error: {0}")]
    Fs(#[from] docsync_fs::Error),

    #[error("Not a git repository: {dir}")]
    NotARepository { dir: PathBuf },

    #[error("Remote '{name}' not found")]
    RemoteNotFound { name: String },

    #[error("Remote mismatch: expected {expected}, found {actual}")]
    RemoteMismatch { expected: String, actual: String },

    #[error("Uncommitted changes in {dir}")]
    UncommittedChanges { dir: PathBuf },

    #[error("HEAD is detached in {dir}; check out a branch first")]
    DetachedHead { dir: PathBuf },

    #[error("Push failed: {message}")]
    PushFailed { message: String },

    #[error("Pull failed: {message}")]
    PullFailed { message: String },

    #[error("Clone failed: {message}")]
    CloneFailed { message: String },

    #[error("{message}")]
    CannotFastForward { message: String },

    #[error("Remote operation failed: {message}")]
    Remote { message: String },
}

impl Error {
    /// Rewrite every message this error carries through `f`.
    ///
    /// Underlying git2 errors are flattened into their message, so nothing
    /// unrewritten survives.
    pub fn map_message(self, f: impl Fn(&str) -> String) -> Self {
        match self {
            Error::Git(e) => Error::Remote {
                message: f(e.message()),
            },
            Error::Remote { message } => Error::Remote {
                message: f(&message),
            },
            Error::PushFailed { message } => Error::PushFailed {
                message: f(&message),
            },
            Error::PullFailed { message } => Error::PullFailed {
                message: f(&message),
            },
            Error::CloneFailed { message } => Error::CloneFailed {
                message: f(&message),
            },
            Error::CannotFastForward { message } => Error::CannotFastForward {
                message: f(&message),
            },
            other => other,
        }
    }
}
