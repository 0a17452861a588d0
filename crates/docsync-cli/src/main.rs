//! docsync CLI
//!
//! Pushes, pulls, checks and assembles document trees.

mod cli;
mod commands;
mod context;
mod error;
mod interactive;

use clap::Parser;
use colored::Colorize;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use cli::{Cli, Commands};
use error::Result;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = execute_command(cli.command).await {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

/// Warnings always reach stderr so failed assets are visible; `--verbose`
/// adds the debug trail.
fn init_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(verbose)
        .with_writer(std::io::stderr)
        .finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("{}: tracing subscriber already set", "warning".yellow());
    }
    tracing::debug!("Verbose mode enabled");
}

async fn execute_command(cmd: Commands) -> Result<()> {
    let cwd = std::env::current_dir()?;
    match cmd {
        Commands::Push { remote, yes } => commands::run_push(&cwd, &remote, yes).await,
        Commands::Pull { remote, track } => commands::run_pull(&cwd, &remote, track).await,
        Commands::Check { dir } => commands::run_check(&cwd, dir.as_deref()),
        Commands::Fix { dir } => commands::run_fix(&cwd, dir.as_deref()),
        Commands::Assemble { dir, json } => commands::run_assemble(&cwd, dir.as_deref(), json),
    }
}
