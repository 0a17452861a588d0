//! Pull command implementation

use std::path::Path;

use colored::Colorize;
use docsync_core::sync::{PullOptions, SyncContext, pull, resolve_document_path};
use docsync_meta::Settings;

use crate::cli::RemoteArgs;
use crate::context::{describe, find_document_root, resolve_target};
use crate::error::{CliError, Result};

/// Run the pull command
///
/// Without `--dir` the enclosing document is updated, or `cwd` itself when
/// it is not inside one yet.
pub async fn run_pull(cwd: &Path, remote: &RemoteArgs, track: bool) -> Result<()> {
    let dir = match &remote.dir {
        Some(dir) => cwd.join(dir),
        None => find_document_root(cwd).unwrap_or_else(|| cwd.to_path_buf()),
    };
    if remote.path.is_none() && !Settings::file(&dir).is_file() {
        return Err(CliError::user(format!(
            "{} is not a document yet; pass --path to choose what to pull",
            dir.display()
        )));
    }
    let path = resolve_document_path(remote.path.as_deref(), &dir)?;
    let target = resolve_target(remote, &path)?;

    println!(
        "{} Pulling {} into {}...",
        "=>".blue().bold(),
        describe(&target),
        dir.display()
    );

    let ctx = SyncContext::new(target, dir);
    let options = PullOptions {
        transport: remote.transport,
        track,
    };
    let report = pull(&ctx, &options).await?;

    super::print_nodes(&report.nodes);
    println!("{} Pulled {}", "OK".green().bold(), report.url.cyan());
    Ok(())
}
