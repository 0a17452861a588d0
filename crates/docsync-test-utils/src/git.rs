//! Git repository fixtures at three realism levels.
//!
//! Choose the lowest-realism fixture that satisfies your test's needs.

use std::fs;
use std::path::{Path, PathBuf};

/// Creates a minimal `.git` directory structure **without** initialising a real
/// git repository.
///
/// Realism level: **FAKE**, directory structure only, no git object store.
///
/// # Panics
/// Panics if the filesystem operations fail.
pub fn fake_git_dir(path: &Path) {
    fs::create_dir_all(path.join(".git/refs/heads"))
        .unwrap_or_else(|e| panic!("fake_git_dir: failed to create .git: {e}"));
    fs::write(path.join(".git/HEAD"), "ref: refs/heads/main\n")
        .unwrap_or_else(|e| panic!("fake_git_dir: failed to write HEAD: {e}"));
}

/// Initialises a real git repository using `git2` (no commit, no remote).
///
/// # Panics
/// Panics if `git2::Repository::init` fails.
pub fn real_git_repo(path: &Path) -> git2::Repository {
    git2::Repository::init(path).unwrap_or_else(|e| {
        panic!(
            "real_git_repo: failed to init repository at {}: {e}",
            path.display()
        )
    })
}

/// Initialises a real repository, commits every file currently in `path`
/// and points `origin` at `remote_url`.
///
/// Realism level: **REAL WITH HISTORY**.
///
/// # Panics
/// Panics if any git operation fails.
pub fn committed_repo_with_remote(path: &Path, remote_url: &str) -> git2::Repository {
    let repo = real_git_repo(path);
    commit_all(&repo, "Initial commit");
    repo.remote("origin", remote_url)
        .unwrap_or_else(|e| panic!("committed_repo_with_remote: failed to add remote: {e}"));
    repo
}

/// Stage every file in the work tree and commit it on HEAD.
///
/// # Panics
/// Panics if any git operation fails.
pub fn commit_all(repo: &git2::Repository, message: &str) -> git2::Oid {
    let mut index = repo.index().unwrap();
    index
        .add_all(["*"], git2::IndexAddOption::DEFAULT, None)
        .unwrap();
    index.write().unwrap();
    let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();
    let sig = git2::Signature::now("Test User", "test@test.com").unwrap();
    let parent = repo.head().ok().map(|h| h.peel_to_commit().unwrap());
    let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();
    repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
        .unwrap_or_else(|e| panic!("commit_all: commit failed: {e}"))
}

/// Creates a bare repository at `<server_root><document_path>.git`, the
/// layout a document server exposes its repositories in.
///
/// Returns the bare repository path.
///
/// # Panics
/// Panics if the repository cannot be created.
pub fn bare_remote(server_root: &Path, document_path: &str) -> PathBuf {
    let bare = server_root.join(format!("{}.git", document_path.trim_start_matches('/')));
    git2::Repository::init_bare(&bare).unwrap_or_else(|e| {
        panic!("bare_remote: failed to init {}: {e}", bare.display())
    });
    bare
}
