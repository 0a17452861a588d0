//! Git plumbing for docsync
//!
//! Every network operation runs inside a [`CredentialRemote`] scope: the
//! remote URL carries credentials only while the operation runs and is
//! restored to its credential-free form on every exit path.

pub mod error;
pub mod helpers;
pub mod probe;
pub mod remote;

pub use error::{Error, Result};
pub use helpers::{
    clone_repository, commit_files, current_branch, fetch_fast_forward, has_uncommitted_changes,
    init_and_commit, is_dirty, open_repository, push_current_branch, record_snapshot,
};
pub use probe::{RepositoryState, probe_repository};
pub use remote::{
    CredentialRemote, PullOutcome, PushOutcome, clone_with_credentials, embed_credentials,
    pull_with_credentials, push_with_credentials, sanitize_message,
};

/// Name of the remote every document repository syncs through.
pub const REMOTE_NAME: &str = "origin";
