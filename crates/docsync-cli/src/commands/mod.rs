//! Command implementations for docsync-cli

pub mod assemble;
pub mod check;
pub mod pull;
pub mod push;

use colored::Colorize;
use docsync_core::AssetReport;
use docsync_core::sync::NodeReport;

pub use assemble::run_assemble;
pub use check::{run_check, run_fix};
pub use pull::run_pull;
pub use push::run_push;

/// Print one line per synced node plus any asset failures.
fn print_nodes(nodes: &[NodeReport]) {
    for node in nodes {
        let status = if node.skipped {
            "skipped (uncommitted changes)".yellow().to_string()
        } else if node.changed.is_empty() {
            "unchanged".dimmed().to_string()
        } else {
            format!("{} file(s) changed", node.changed.len())
        };
        println!(
            "   {} {} {} via {}: {}{}",
            "+".green(),
            node.reference.to_string().bold(),
            node.path.cyan(),
            node.transport,
            status,
            asset_summary(&node.assets)
        );
        for failure in &node.assets.failed {
            println!(
                "     {} {}: {}",
                "!".red(),
                failure.name.yellow(),
                failure.message
            );
        }
    }
}

fn asset_summary(report: &AssetReport) -> String {
    let mut parts = Vec::new();
    if !report.transferred.is_empty() {
        parts.push(format!("{} asset(s) transferred", report.transferred.len()));
    }
    if !report.failed.is_empty() {
        parts.push(format!("{} failed", report.failed.len()));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(", {}", parts.join(", "))
    }
}
