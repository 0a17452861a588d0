//! Credential-bearing remote operations
//!
//! The remote URL is the one piece of shared mutable state a sync touches.
//! [`CredentialRemote`] sets the credential URL on acquisition and restores
//! the clean URL when dropped, whether the operation succeeded or not.

use std::path::Path;

use docsync_meta::Credentials;
use git2::{Remote, Repository};

use crate::helpers::{
    clone_repository, fetch_fast_forward, has_uncommitted_changes, open_repository,
    push_current_branch,
};
use crate::{Error, REMOTE_NAME, Result};

/// Embed `credentials` into an `http(s)` URL.
///
/// Other schemes (`file://`, local paths, ssh) are returned unchanged since
/// they authenticate out of band. Existing user info is replaced.
pub fn embed_credentials(url: &str, credentials: &Credentials) -> String {
    let Some((scheme, rest)) = url.split_once("://") else {
        return url.to_string();
    };
    if !scheme.eq_ignore_ascii_case("http") && !scheme.eq_ignore_ascii_case("https") {
        return url.to_string();
    }
    if credentials.username.is_empty() && credentials.password.is_empty() {
        return url.to_string();
    }

    let authority_end = rest.find('/').unwrap_or(rest.len());
    let (authority, tail) = rest.split_at(authority_end);
    let host = authority.rsplit_once('@').map_or(authority, |(_, host)| host);

    format!(
        "{}://{}:{}@{}{}",
        scheme,
        urlencoding::encode(&credentials.username),
        urlencoding::encode(&credentials.password),
        host,
        tail
    )
}

/// Replace every occurrence of `credential_url` in `message` with `clean_url`.
pub fn sanitize_message(message: &str, credential_url: &str, clean_url: &str) -> String {
    if credential_url.is_empty() || credential_url == clean_url {
        return message.to_string();
    }
    message.replace(credential_url, clean_url)
}

/// Scoped credential URL on a repository remote.
pub struct CredentialRemote<'r> {
    repo: &'r Repository,
    name: String,
    clean_url: String,
    credential_url: String,
}

impl<'r> CredentialRemote<'r> {
    /// Point remote `name` at `clean_url` with `credentials` embedded.
    pub fn acquire(
        repo: &'r Repository,
        name: &str,
        clean_url: &str,
        credentials: &Credentials,
    ) -> Result<Self> {
        let credential_url = embed_credentials(clean_url, credentials);
        repo.remote_set_url(name, &credential_url)?;
        Ok(Self {
            repo,
            name: name.to_string(),
            clean_url: clean_url.to_string(),
            credential_url,
        })
    }

    /// The remote, carrying the credential URL.
    pub fn remote(&self) -> Result<Remote<'r>> {
        self.repo
            .find_remote(&self.name)
            .map_err(|_| Error::RemoteNotFound {
                name: self.name.clone(),
            })
    }

    /// Strip the credential URL out of `message`.
    pub fn sanitize(&self, message: &str) -> String {
        sanitize_message(message, &self.credential_url, &self.clean_url)
    }

    /// Strip the credential URL out of every message `error` carries.
    pub fn scrub(&self, error: Error) -> Error {
        error.map_message(|m| self.sanitize(m))
    }
}

impl Drop for CredentialRemote<'_> {
    fn drop(&mut self) {
        if let Err(e) = self.repo.remote_set_url(&self.name, &self.clean_url) {
            tracing::warn!(
                remote = %self.name,
                error = %self.sanitize(e.message()),
                "Failed to restore credential-free remote URL"
            );
        }
    }
}

/// Result of a credentialed push.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushOutcome {
    /// First push of the branch; upstream tracking was configured
    FirstPush,
    Pushed,
}

/// Result of a credentialed pull.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PullOutcome {
    Cloned,
    Updated,
    /// Local tracked files had uncommitted changes; nothing was pulled
    SkippedDirty,
}

/// Push the current branch of the repository at `dir` through `origin`.
///
/// The remote's current URL is taken as the clean URL to restore.
pub fn push_with_credentials(dir: &Path, credentials: &Credentials) -> Result<PushOutcome> {
    let repo = open_repository(dir)?;
    let clean_url = repo
        .find_remote(REMOTE_NAME)
        .map_err(|_| Error::RemoteNotFound {
            name: REMOTE_NAME.to_string(),
        })?
        .url()
        .unwrap_or_default()
        .to_string();

    let guard = CredentialRemote::acquire(&repo, REMOTE_NAME, &clean_url, credentials)?;
    let first_push = guard
        .remote()
        .and_then(|mut remote| push_current_branch(&repo, &mut remote))
        .map_err(|e| guard.scrub(e))?;
    drop(guard);

    tracing::info!(dir = %dir.display(), remote = %clean_url, first_push, "Pushed");
    Ok(if first_push {
        PushOutcome::FirstPush
    } else {
        PushOutcome::Pushed
    })
}

/// Clone `clean_url` into `dir` using `credentials`, leaving only the clean
/// URL in the new repository's configuration.
pub fn clone_with_credentials(
    clean_url: &str,
    dir: &Path,
    credentials: &Credentials,
) -> Result<PullOutcome> {
    let credential_url = embed_credentials(clean_url, credentials);
    let repo = clone_repository(&credential_url, dir)
        .map_err(|e| e.map_message(|m| sanitize_message(m, &credential_url, clean_url)))?;
    repo.remote_set_url(REMOTE_NAME, clean_url)?;

    tracing::info!(dir = %dir.display(), remote = %clean_url, "Cloned");
    Ok(PullOutcome::Cloned)
}

/// Fast-forward the repository at `dir` from `clean_url`.
///
/// The configured remote must equal `clean_url` exactly; a different remote
/// is an error, never silently repointed. Uncommitted tracked changes skip
/// the pull with a warning.
pub fn pull_with_credentials(
    dir: &Path,
    clean_url: &str,
    credentials: &Credentials,
) -> Result<PullOutcome> {
    let repo = open_repository(dir)?;
    let actual = repo
        .find_remote(REMOTE_NAME)
        .map_err(|_| Error::RemoteNotFound {
            name: REMOTE_NAME.to_string(),
        })?
        .url()
        .unwrap_or_default()
        .to_string();
    if actual != clean_url {
        return Err(Error::RemoteMismatch {
            expected: clean_url.to_string(),
            actual,
        });
    }

    if has_uncommitted_changes(&repo)? {
        tracing::warn!(dir = %dir.display(), "Uncommitted changes, skipping pull");
        return Ok(PullOutcome::SkippedDirty);
    }

    let guard = CredentialRemote::acquire(&repo, REMOTE_NAME, clean_url, credentials)?;
    guard
        .remote()
        .and_then(|mut remote| fetch_fast_forward(&repo, &mut remote))
        .map_err(|e| guard.scrub(e))?;
    drop(guard);

    tracing::info!(dir = %dir.display(), remote = %clean_url, "Pulled");
    Ok(PullOutcome::Updated)
}
