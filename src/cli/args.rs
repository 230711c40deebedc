//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// threepen - three.js live-preview playground
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: threepen.toml)
    #[arg(short = 'C', long, global = true, default_value = "threepen.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Watch a sketch and serve its live preview
    #[command(visible_alias = "s")]
    Serve {
        /// Sketch file to watch (created with a starter scene if missing)
        #[arg(value_hint = clap::ValueHint::FilePath)]
        entry: Option<PathBuf>,

        /// Network interface to bind (e.g., 127.0.0.1, 0.0.0.0)
        #[arg(short, long)]
        interface: Option<std::net::IpAddr>,

        /// Port number to listen on
        #[arg(short, long)]
        port: Option<u16>,

        #[command(flatten)]
        preview: PreviewArgs,
    },

    /// Print the composed preview document for a sketch
    #[command(visible_alias = "c")]
    Compose {
        /// Sketch file to compose
        #[arg(value_hint = clap::ValueHint::FilePath)]
        entry: Option<PathBuf>,

        /// Write the document to a file instead of stdout
        #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
        output: Option<PathBuf>,

        #[command(flatten)]
        preview: PreviewArgs,
    },

    /// List available three.js revisions, most recent first
    #[command(visible_alias = "v")]
    Versions {
        /// Show at most this many revisions
        #[arg(short, long)]
        limit: Option<usize>,
    },
}

/// Shared preview arguments for Serve and Compose commands
#[derive(clap::Args, Debug, Clone, Default)]
pub struct PreviewArgs {
    /// three.js revision to pin (e.g. 160 for r160); defaults to the latest release
    #[arg(short, long)]
    pub revision: Option<u32>,

    /// Quiet period in milliseconds before an edit re-renders the preview
    #[arg(short, long)]
    pub debounce: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve() {
        let cli = Cli::parse_from(["threepen", "serve", "scene.js", "-p", "8080", "-r", "150"]);
        match &cli.command {
            Commands::Serve {
                entry,
                port,
                preview,
                ..
            } => {
                assert_eq!(entry.as_deref(), Some(std::path::Path::new("scene.js")));
                assert_eq!(*port, Some(8080));
                assert_eq!(preview.revision, Some(150));
            }
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn test_parse_compose_with_global_flags() {
        let cli = Cli::parse_from(["threepen", "-v", "compose", "-o", "out.html"]);
        assert!(cli.verbose);
    }

    #[test]
    fn test_parse_versions() {
        let cli = Cli::parse_from(["threepen", "versions", "--limit", "5"]);
        assert!(matches!(cli.command, Commands::Versions { limit: Some(5) }));
        assert_eq!(cli.config, PathBuf::from("threepen.toml"));
    }
}
