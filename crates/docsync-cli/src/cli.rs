//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use docsync_core::TransportChoice;

/// docsync - Keep local document trees in sync with a document server
#[derive(Parser, Debug)]
#[command(name = "docsync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Where a sync goes and how it gets there
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct RemoteArgs {
    /// Named target from targets.toml (default target when omitted)
    #[arg(short, long)]
    pub target: Option<String>,

    /// Server URL, overriding the target's
    #[arg(long, env = "DOCSYNC_SERVER")]
    pub server: Option<String>,

    /// Username, overriding the target's
    #[arg(long, env = "DOCSYNC_USERNAME")]
    pub username: Option<String>,

    /// Password, overriding the target's
    #[arg(long, env = "DOCSYNC_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Document path on the server (defaults to the path in settings.json)
    #[arg(short, long)]
    pub path: Option<String>,

    /// Local document directory (defaults to the enclosing document)
    #[arg(short, long)]
    pub dir: Option<PathBuf>,

    /// Transport to use: auto, git or archive
    #[arg(long, default_value = "auto")]
    pub transport: TransportChoice,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Send the local document tree to the server
    ///
    /// Template and slot documents are pushed before the root that uses them.
    ///
    /// Examples:
    ///   docsync push                       # Push the enclosing document
    ///   docsync push --transport archive   # Force the archive transport
    ///   docsync push -t staging --yes      # Push to a named target without asking
    Push {
        #[command(flatten)]
        remote: RemoteArgs,

        /// Skip the upload plan confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Fetch the document tree from the server
    ///
    /// Examples:
    ///   docsync pull                       # Update the enclosing document
    ///   docsync pull -p /blog -d blog      # Fetch /blog into ./blog
    Pull {
        #[command(flatten)]
        remote: RemoteArgs,

        /// Record archive pulls as commits in a local repository
        #[arg(long)]
        track: bool,
    },

    /// Check the document tree for configuration drift and path collisions
    Check {
        /// Document directory (defaults to the enclosing document)
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },

    /// Apply every automatic fix the check reports
    Fix {
        /// Document directory (defaults to the enclosing document)
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },

    /// Assemble the local document tree and print it
    Assemble {
        /// Document directory (defaults to the enclosing document)
        #[arg(short, long)]
        dir: Option<PathBuf>,

        /// Output the full document as JSON
        #[arg(long)]
        json: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_push_defaults() {
        let cli = Cli::parse_from(["docsync", "push"]);
        match cli.command {
            Commands::Push { remote, yes } => {
                assert_eq!(remote.transport, TransportChoice::Auto);
                assert!(remote.path.is_none());
                assert!(!yes);
            }
            other => panic!("Expected Push, got {:?}", other),
        }
    }

    #[test]
    fn parse_pull_with_options() {
        let cli = Cli::parse_from([
            "docsync",
            "pull",
            "--transport",
            "tar",
            "--track",
            "-p",
            "/blog",
            "--server",
            "https://docs.example.com",
        ]);
        match cli.command {
            Commands::Pull { remote, track } => {
                assert_eq!(remote.transport, TransportChoice::Archive);
                assert_eq!(remote.path.as_deref(), Some("/blog"));
                assert_eq!(remote.server.as_deref(), Some("https://docs.example.com"));
                assert!(track);
            }
            other => panic!("Expected Pull, got {:?}", other),
        }
    }

    #[test]
    fn unknown_transport_is_rejected() {
        let result = Cli::try_parse_from(["docsync", "push", "--transport", "ftp"]);
        assert!(result.is_err());
    }

    #[test]
    fn verbose_is_global() {
        let cli = Cli::parse_from(["docsync", "check", "--verbose"]);
        assert!(cli.verbose);
        assert_eq!(cli.command, Commands::Check { dir: None });
    }

    #[test]
    fn assemble_json_flag() {
        let cli = Cli::parse_from(["docsync", "assemble", "--json"]);
        assert_eq!(
            cli.command,
            Commands::Assemble {
                dir: None,
                json: true
            }
        );
    }
}
