//! Shared git2 helper functions
//!
//! These functions are credential-agnostic: they operate on whatever URL the
//! remote currently has. Credential handling lives in [`crate::remote`].

use std::path::Path;

use git2::{
    BranchType, IndexAddOption, Oid, PushOptions, Remote, RemoteCallbacks, Repository,
    Signature, StatusOptions,
};

use docsync_fs::DocPath;

use crate::{Error, Result};

/// Get the current branch name, failing on a detached HEAD.
pub fn current_branch(repo: &Repository) -> Result<String> {
    let head = repo.head()?;
    if head.is_branch() {
        Ok(head.shorthand().unwrap_or("HEAD").to_string())
    } else {
        Err(Error::DetachedHead {
            dir: repo.workdir().unwrap_or_else(|| repo.path()).to_path_buf(),
        })
    }
}

/// Push the current branch to `remote`.
///
/// The first push of a branch (no upstream configured yet) records the
/// remote-tracking ref and sets the upstream afterwards; later pushes are
/// plain. Returns `true` when this was a first push.
pub fn push_current_branch(repo: &Repository, remote: &mut Remote<'_>) -> Result<bool> {
    let branch_name = current_branch(repo)?;
    let remote_name = remote.name().unwrap_or(crate::REMOTE_NAME).to_string();
    let first_push = repo
        .find_branch(&branch_name, BranchType::Local)?
        .upstream()
        .is_err();

    let refspec = format!("refs/heads/{}:refs/heads/{}", branch_name, branch_name);

    let mut rejected: Option<String> = None;
    {
        let mut callbacks = RemoteCallbacks::new();
        callbacks.push_update_reference(|refname, status| {
            if let Some(message) = status {
                rejected = Some(format!("{refname}: {message}"));
            }
            Ok(())
        });
        let mut options = PushOptions::new();
        options.remote_callbacks(callbacks);

        remote
            .push(&[&refspec], Some(&mut options))
            .map_err(|e| Error::PushFailed {
                message: e.message().to_string(),
            })?;
    }
    if let Some(message) = rejected {
        return Err(Error::PushFailed { message });
    }

    if first_push {
        let head = repo.head()?.peel_to_commit()?;
        repo.reference(
            &format!("refs/remotes/{}/{}", remote_name, branch_name),
            head.id(),
            true,
            "push: record upstream",
        )?;
        let mut branch = repo.find_branch(&branch_name, BranchType::Local)?;
        branch.set_upstream(Some(&format!("{}/{}", remote_name, branch_name)))?;
        tracing::debug!(branch = %branch_name, remote = %remote_name, "Upstream configured");
    }

    Ok(first_push)
}

/// Fetch the current branch from `remote` and fast-forward onto it.
///
/// Returns an error if a fast-forward is not possible.
pub fn fetch_fast_forward(repo: &Repository, remote: &mut Remote<'_>) -> Result<()> {
    let branch_name = current_branch(repo)?;

    remote
        .fetch(&[&branch_name], None, None)
        .map_err(|e| Error::PullFailed {
            message: format!("Fetch failed: {}", e.message()),
        })?;

    let fetch_head = repo
        .find_reference("FETCH_HEAD")
        .map_err(|e| Error::PullFailed {
            message: format!("Could not find FETCH_HEAD: {}", e.message()),
        })?;

    let fetch_commit = fetch_head.peel_to_commit().map_err(|e| Error::PullFailed {
        message: format!("Could not resolve FETCH_HEAD: {}", e.message()),
    })?;

    let head_commit = repo.head()?.peel_to_commit()?;

    let (merge_analysis, _) =
        repo.merge_analysis(&[&repo.find_annotated_commit(fetch_commit.id())?])?;

    if merge_analysis.is_up_to_date() {
        return Ok(());
    }

    if merge_analysis.is_fast_forward() {
        let refname = format!("refs/heads/{}", branch_name);
        let mut reference = repo.find_reference(&refname)?;
        reference.set_target(
            fetch_commit.id(),
            &format!("pull: fast-forward to {}", fetch_commit.id()),
        )?;
        repo.checkout_head(Some(git2::build::CheckoutBuilder::default().force()))?;
        return Ok(());
    }

    Err(Error::CannotFastForward {
        message: format!(
            "Cannot fast-forward {} from {} to {}. Manual merge required.",
            branch_name,
            head_commit.id(),
            fetch_commit.id()
        ),
    })
}

/// Clone `url` into `dir`, which must be missing or empty.
pub fn clone_repository(url: &str, dir: &Path) -> Result<Repository> {
    git2::build::RepoBuilder::new()
        .clone(url, dir)
        .map_err(|e| Error::CloneFailed {
            message: e.message().to_string(),
        })
}

/// True when tracked files have staged or unstaged modifications.
///
/// Untracked files do not count: `template/`, `slot/` and `uploads/` often
/// sit untracked inside a root document's working tree.
pub fn has_uncommitted_changes(repo: &Repository) -> Result<bool> {
    let mut options = StatusOptions::new();
    options.include_untracked(false).include_ignored(false);
    let statuses = repo.statuses(Some(&mut options))?;
    Ok(!statuses.is_empty())
}

/// Initialise a repository at `dir` and commit `files` (paths relative to `dir`).
pub fn init_and_commit(dir: &Path, files: &[String], message: &str) -> Result<Oid> {
    let repo = Repository::init(dir)?;
    commit_files(&repo, files, message)
}

/// Open the repository rooted at `dir` (no upward search).
pub fn open_repository(dir: &Path) -> Result<Repository> {
    Repository::open(dir).map_err(|_| Error::NotARepository {
        dir: dir.to_path_buf(),
    })
}

/// True when the repository rooted at `dir` has uncommitted tracked changes.
pub fn is_dirty(dir: &Path) -> Result<bool> {
    has_uncommitted_changes(&open_repository(dir)?)
}

/// Commit `files` in the repository at `dir`, initialising one first when
/// `dir` is not a repository yet.
pub fn record_snapshot(dir: &Path, files: &[String], message: &str) -> Result<Oid> {
    if DocPath::GitDir.under(dir).exists() {
        commit_files(&open_repository(dir)?, files, message)
    } else {
        init_and_commit(dir, files, message)
    }
}

/// Stage `files` (paths relative to the work tree) and commit them on HEAD.
pub fn commit_files(repo: &Repository, files: &[String], message: &str) -> Result<Oid> {
    let mut index = repo.index()?;
    if files.is_empty() {
        index.add_all(["*"], IndexAddOption::DEFAULT, None)?;
    } else {
        for file in files {
            index.add_path(Path::new(file))?;
        }
    }
    index.write()?;

    let tree_id = index.write_tree()?;
    let tree = repo.find_tree(tree_id)?;
    let signature = repo
        .signature()
        .or_else(|_| Signature::now("docsync", "docsync@localhost"))?;

    let parent = match repo.head() {
        Ok(head) => Some(head.peel_to_commit()?),
        Err(_) => None,
    };
    let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();

    let oid = repo.commit(
        Some("HEAD"),
        &signature,
        &signature,
        message,
        &tree,
        &parents,
    )?;
    Ok(oid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_and_commit_then_clean() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("content.md"), "# Hi").unwrap();

        init_and_commit(temp.path(), &["content.md".to_string()], "Initial").unwrap();

        let repo = Repository::open(temp.path()).unwrap();
        assert!(!has_uncommitted_changes(&repo).unwrap());
        let branch = current_branch(&repo).unwrap();
        assert!(branch == "main" || branch == "master");
    }

    #[test]
    fn test_record_snapshot_inits_then_appends() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("content.md"), "# One").unwrap();
        record_snapshot(temp.path(), &["content.md".to_string()], "Import").unwrap();

        std::fs::write(temp.path().join("content.md"), "# Two").unwrap();
        assert!(is_dirty(temp.path()).unwrap());
        let second = record_snapshot(temp.path(), &["content.md".to_string()], "Update").unwrap();

        let repo = Repository::open(temp.path()).unwrap();
        let head = repo.head().unwrap().peel_to_commit().unwrap();
        assert_eq!(head.id(), second);
        assert_eq!(head.parent_count(), 1);
        assert!(!is_dirty(temp.path()).unwrap());
    }

    #[test]
    fn test_modified_tracked_file_is_uncommitted() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("content.md"), "# Hi").unwrap();
        init_and_commit(temp.path(), &["content.md".to_string()], "Initial").unwrap();

        std::fs::write(temp.path().join("content.md"), "# Changed").unwrap();

        let repo = Repository::open(temp.path()).unwrap();
        assert!(has_uncommitted_changes(&repo).unwrap());
    }

    #[test]
    fn test_untracked_files_do_not_count() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("content.md"), "# Hi").unwrap();
        init_and_commit(temp.path(), &["content.md".to_string()], "Initial").unwrap();

        std::fs::create_dir(temp.path().join("uploads")).unwrap();
        std::fs::write(temp.path().join("uploads/logo.png"), "png").unwrap();

        let repo = Repository::open(temp.path()).unwrap();
        assert!(!has_uncommitted_changes(&repo).unwrap());
    }

    #[test]
    fn test_second_commit_has_parent() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("content.md"), "one").unwrap();
        init_and_commit(temp.path(), &["content.md".to_string()], "Initial").unwrap();

        std::fs::write(temp.path().join("content.md"), "two").unwrap();
        let repo = Repository::open(temp.path()).unwrap();
        let oid = commit_files(&repo, &["content.md".to_string()], "Update").unwrap();

        let commit = repo.find_commit(oid).unwrap();
        assert_eq!(commit.parent_count(), 1);
    }
}
