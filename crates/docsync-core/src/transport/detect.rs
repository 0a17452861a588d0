//! Transport detection

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use docsync_fs::io;
use docsync_git::{RepositoryState, probe_repository};

use crate::Result;

/// How a node is synchronized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    Git,
    Archive,
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportKind::Git => write!(f, "git"),
            TransportKind::Archive => write!(f, "archive"),
        }
    }
}

/// The local facts transport detection depends on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirState {
    /// Missing or containing nothing at all
    Empty,
    /// A repository, with or without an `origin` remote
    Repository { has_remote: bool },
    /// Files but no repository
    Plain,
}

/// Inspect `dir` for [`detect_transport`].
pub fn probe_dir_state(dir: &Path) -> Result<DirState> {
    if io::is_empty_dir(dir)? {
        return Ok(DirState::Empty);
    }
    Ok(match probe_repository(dir) {
        RepositoryState::Missing => DirState::Plain,
        RepositoryState::NoRemote => DirState::Repository { has_remote: false },
        RepositoryState::Remote { .. } => DirState::Repository { has_remote: true },
    })
}

/// Pick a transport for a directory in `state`.
///
/// Empty directories and repositories with a remote use git; everything
/// else, including a repository without a remote, uses archives.
pub fn detect_transport(state: &DirState) -> TransportKind {
    match state {
        DirState::Empty => TransportKind::Git,
        DirState::Repository { has_remote: true } => TransportKind::Git,
        DirState::Repository { has_remote: false } | DirState::Plain => TransportKind::Archive,
    }
}

/// Caller preference: detect, or force one transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransportChoice {
    #[default]
    Auto,
    Git,
    Archive,
}

impl TransportChoice {
    /// Resolve to a concrete transport for `dir`.
    pub fn resolve(&self, dir: &Path) -> Result<TransportKind> {
        match self {
            TransportChoice::Git => Ok(TransportKind::Git),
            TransportChoice::Archive => Ok(TransportKind::Archive),
            TransportChoice::Auto => {
                let state = probe_dir_state(dir)?;
                let kind = detect_transport(&state);
                tracing::debug!(dir = %dir.display(), ?state, %kind, "Detected transport");
                Ok(kind)
            }
        }
    }
}

impl FromStr for TransportChoice {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(TransportChoice::Auto),
            "git" => Ok(TransportChoice::Git),
            "archive" | "tar" => Ok(TransportChoice::Archive),
            other => Err(format!("unknown transport '{other}' (expected auto, git or archive)")),
        }
    }
}
