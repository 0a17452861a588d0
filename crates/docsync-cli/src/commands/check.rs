//! Check and fix command implementations
//!
//! Both run the tree validator; fix applies the fixes it proposes and
//! validates again.

use std::path::Path;

use colored::Colorize;
use docsync_core::{Issue, IssueKind, apply_fixes, validate_tree};

use crate::context::document_dir;
use crate::error::{CliError, Result};

/// Run the check command
///
/// Fails when any issue is found so scripts can gate on it.
pub fn run_check(cwd: &Path, dir: Option<&Path>) -> Result<()> {
    let dir = document_dir(cwd, dir)?;
    println!("{} Checking {}...", "=>".blue().bold(), dir.display());

    let issues = validate_tree(&dir)?;
    if issues.is_empty() {
        println!("{} No issues found.", "OK".green().bold());
        return Ok(());
    }

    print_issues(&issues);
    println!();
    if issues.iter().any(Issue::is_fixable) {
        println!("Run {} to repair.", "docsync fix".cyan());
    }
    Err(CliError::user(format!("{} issue(s) found", issues.len())))
}

/// Run the fix command
pub fn run_fix(cwd: &Path, dir: Option<&Path>) -> Result<()> {
    let dir = document_dir(cwd, dir)?;
    println!("{} Fixing {}...", "=>".blue().bold(), dir.display());

    let issues = validate_tree(&dir)?;
    for issue in issues.iter().filter(|i| i.is_fixable()) {
        if let Some(fix) = &issue.fix {
            println!("   {} {}", "+".green(), fix);
        }
    }
    let applied = apply_fixes(&issues)?;

    let remaining = validate_tree(&dir)?;
    if remaining.is_empty() {
        println!("{} Applied {} fix(es). No issues remain.", "OK".green().bold(), applied);
        return Ok(());
    }

    println!(
        "{} Applied {} fix(es). Manual intervention required for:",
        "!".yellow().bold(),
        applied
    );
    print_issues(&remaining);
    Err(CliError::user(format!(
        "{} issue(s) could not be fixed automatically",
        remaining.len()
    )))
}

fn print_issues(issues: &[Issue]) {
    for issue in issues {
        let label = match issue.kind {
            IssueKind::Configuration => "CONFIG".yellow().bold(),
            IssueKind::Consistency => "COLLISION".red().bold(),
        };
        println!(
            "   {} {} ({}): {}",
            label,
            issue.dir.display().to_string().cyan(),
            issue.reference.to_string().dimmed(),
            issue.message
        );
    }
}
