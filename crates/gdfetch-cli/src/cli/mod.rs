//! CLI for gdfetch.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use gdfetch_core::config;
use std::path::PathBuf;

use commands::{
    run_completions, run_config, run_fetch, run_flatten, run_locate, run_man, FetchOverrides,
};

/// Top-level CLI for gdfetch.
#[derive(Debug, Parser)]
#[command(name = "gdfetch", version)]
#[command(
    about = "gdfetch: find, download and unpack a specific Geometry Dash version",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Search for a version, download it, unpack it and name the executable.
    Fetch {
        /// Version to look for (e.g. 2.2).
        version: String,
        /// Directory for the download and the extracted files (default: current directory).
        #[arg(long, value_name = "DIR")]
        download_dir: Option<PathBuf>,
        /// Override the configured maximum number of search attempts.
        #[arg(long, value_name = "N")]
        max_attempts: Option<u32>,
        /// Only accept links whose href contains this text.
        #[arg(long, value_name = "TEXT")]
        link_marker: Option<String>,
    },

    /// List executables in a directory; with --version, rename a single match.
    Locate {
        /// Directory to scan.
        dir: PathBuf,
        /// Rename a lone executable to its canonical name for this version.
        #[arg(long)]
        version: Option<String>,
        /// Scan subdirectories too (never renames).
        #[arg(long)]
        deep: bool,
    },

    /// Move every nested file to the directory root and remove empty subdirectories.
    Flatten {
        /// Directory to flatten.
        dir: PathBuf,
    },

    /// Show the config file path and the effective settings.
    Config,

    /// Print shell completions.
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Print the man page (roff) to stdout.
    Man,
}

impl CliCommand {
    /// Parse arguments and run. `Ok(false)` means the command finished
    /// without producing what was asked for (e.g. no link found).
    pub async fn run_from_args() -> Result<bool> {
        let cli = Cli::parse();

        match cli.command {
            CliCommand::Fetch {
                version,
                download_dir,
                max_attempts,
                link_marker,
            } => {
                let cfg = config::load_or_init()?;
                tracing::debug!("loaded config: {:?}", cfg);
                let download_dir = match download_dir {
                    Some(d) => d,
                    None => std::env::current_dir()?,
                };
                let overrides = FetchOverrides {
                    max_attempts,
                    link_marker,
                };
                run_fetch(cfg, overrides, &version, &download_dir).await
            }
            CliCommand::Locate { dir, version, deep } => {
                let cfg = config::load_or_init()?;
                run_locate(&cfg, &dir, version.as_deref(), deep)
            }
            CliCommand::Flatten { dir } => run_flatten(&dir).map(|()| true),
            CliCommand::Config => run_config().map(|()| true),
            CliCommand::Completions { shell } => run_completions(shell).map(|()| true),
            CliCommand::Man => run_man().map(|()| true),
        }
    }
}

#[cfg(test)]
mod tests;
