//! Repository probing

use std::path::Path;

use docsync_fs::DocPath;
use git2::Repository;

use crate::REMOTE_NAME;

/// What a directory looks like from the version-control point of view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepositoryState {
    /// No repository rooted at the directory
    Missing,
    /// A repository without an `origin` remote
    NoRemote,
    /// A repository whose `origin` remote points at `url`
    Remote { url: String },
}

impl RepositoryState {
    pub fn is_repository(&self) -> bool {
        !matches!(self, RepositoryState::Missing)
    }

    pub fn has_remote(&self) -> bool {
        matches!(self, RepositoryState::Remote { .. })
    }
}

/// Inspect `dir` without searching parent directories.
///
/// A `template/` directory inside a tracked root therefore never reports the
/// root's repository as its own.
pub fn probe_repository(dir: &Path) -> RepositoryState {
    if !DocPath::GitDir.under(dir).exists() {
        return RepositoryState::Missing;
    }
    let repo = match Repository::open(dir) {
        Ok(repo) => repo,
        Err(e) => {
            tracing::debug!(dir = %dir.display(), error = %e, "Unreadable .git, treating as no repository");
            return RepositoryState::Missing;
        }
    };
    match repo.find_remote(REMOTE_NAME) {
        Ok(remote) => RepositoryState::Remote {
            url: remote.url().unwrap_or_default().to_string(),
        },
        Err(_) => RepositoryState::NoRemote,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn plain_directory_is_missing() {
        let temp = TempDir::new().unwrap();
        assert_eq!(probe_repository(temp.path()), RepositoryState::Missing);
    }

    #[test]
    fn repository_without_remote() {
        let temp = TempDir::new().unwrap();
        Repository::init(temp.path()).unwrap();
        assert_eq!(probe_repository(temp.path()), RepositoryState::NoRemote);
    }

    #[test]
    fn repository_with_remote() {
        let temp = TempDir::new().unwrap();
        let repo = Repository::init(temp.path()).unwrap();
        repo.remote(REMOTE_NAME, "https://docs.example.com/a.git").unwrap();

        let state = probe_repository(temp.path());
        assert!(state.has_remote());
        assert_eq!(
            state,
            RepositoryState::Remote {
                url: "https://docs.example.com/a.git".into()
            }
        );
    }

    #[test]
    fn child_directory_does_not_inherit_parent_repository() {
        let temp = TempDir::new().unwrap();
        Repository::init(temp.path()).unwrap();
        let child = temp.path().join("template");
        std::fs::create_dir(&child).unwrap();

        assert_eq!(probe_repository(&child), RepositoryState::Missing);
    }
}
