//! CLI for the kanakuri range downloader.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use kanakuri_core::config::{self, TransferConfig};
use std::path::PathBuf;

use commands::{run_checksum, run_completions, run_config, run_fetch, run_man, FetchArgs};

/// Top-level CLI for the kanakuri downloader.
#[derive(Debug, Parser)]
#[command(name = "kanakuri")]
#[command(about = "kanakuri: adaptive, resumable, hash-verified HTTP range downloads", long_about = None)]
pub struct Cli {
    /// Log per-chunk diagnostics (requested range, response time, errors).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file to use instead of ~/.config/kanakuri/config.toml.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Download a file of known size and SHA-256 in adaptive chunks, then verify it.
    Fetch(FetchArgs),

    /// Compute SHA-256 of a file.
    Checksum {
        /// Path to the file.
        path: PathBuf,
        /// Print hex instead of base64.
        #[arg(long)]
        hex: bool,
    },

    /// Show the effective configuration and where it was loaded from.
    Config,

    /// Print shell completions to stdout.
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },

    /// Print a man page to stdout.
    Man,
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }

    /// Load the config file (explicit `--config`, else the XDG default,
    /// created on first use). An unusable default location is not fatal.
    fn load_config(&self) -> Result<TransferConfig> {
        if let Some(path) = &self.config {
            return config::load_from_path(path);
        }
        match config::load_or_init() {
            Ok(cfg) => Ok(cfg),
            Err(e) => {
                tracing::warn!("using built-in defaults, config unavailable: {:#}", e);
                Ok(TransferConfig::default())
            }
        }
    }

    pub async fn run(self) -> Result<()> {
        match &self.command {
            CliCommand::Completions { shell } => return run_completions(*shell),
            CliCommand::Man => return run_man(),
            _ => {}
        }

        let mut cfg = self.load_config()?;
        cfg.verbose |= self.verbose;
        tracing::debug!("loaded config: {:?}", cfg);

        match self.command {
            CliCommand::Fetch(args) => run_fetch(args, cfg).await?,
            CliCommand::Checksum { path, hex } => run_checksum(&path, hex).await?,
            CliCommand::Config => run_config(self.config.as_deref(), &cfg)?,
            CliCommand::Completions { .. } | CliCommand::Man => {}
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
