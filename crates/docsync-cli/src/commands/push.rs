//! Push command implementation

use std::path::Path;

use colored::Colorize;
use docsync_core::sync::{AutoConfirm, PushOptions, SyncContext, push, resolve_document_path};

use crate::cli::RemoteArgs;
use crate::context::{describe, document_dir, resolve_target};
use crate::error::Result;
use crate::interactive::PromptConfirm;

/// Run the push command
///
/// Sends the document tree at (or above) `cwd` to the resolved target.
pub async fn run_push(cwd: &Path, remote: &RemoteArgs, yes: bool) -> Result<()> {
    let dir = document_dir(cwd, remote.dir.as_deref())?;
    let path = resolve_document_path(remote.path.as_deref(), &dir)?;
    let target = resolve_target(remote, &path)?;

    println!(
        "{} Pushing {} to {}...",
        "=>".blue().bold(),
        dir.display(),
        describe(&target)
    );

    let ctx = SyncContext::new(target, dir);
    let ctx = if yes {
        ctx.with_confirm(Box::new(AutoConfirm))
    } else {
        ctx.with_confirm(Box::new(PromptConfirm))
    };

    let options = PushOptions {
        transport: remote.transport,
    };
    let report = push(&ctx, &options).await?;

    super::print_nodes(&report.nodes);
    println!("{} Pushed {}", "OK".green().bold(), report.url.cyan());
    Ok(())
}
