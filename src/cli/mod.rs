//! Command-line interface for outline-backup.
//!
//! Connection settings are shared by every subcommand and layered as
//! config file < environment < flags.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::Config;
use crate::Result;

pub mod backup;
pub mod status;

/// outline-backup - export an Outline workspace to a local archive
#[derive(Parser)]
#[command(name = "outline-backup")]
#[command(about = "Trigger, poll and download a full Outline workspace export")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Export the workspace and save the archive
    Backup(backup::BackupArgs),
    /// Show the state of an existing export job
    Status(status::StatusArgs),
}

/// Where the server is and how to authenticate
#[derive(Args, Debug, Default)]
pub struct ConnectionArgs {
    /// Config file (defaults to <config dir>/outline-backup/config.toml)
    #[arg(long, env = "OUTLINE_BACKUP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Outline host, e.g. docs.example.com
    #[arg(long, env = "OUTLINE_HOST")]
    pub host: Option<String>,

    /// API token
    #[arg(long, env = "OUTLINE_TOKEN", hide_env_values = true)]
    pub token: Option<String>,
}

impl ConnectionArgs {
    /// Load the config file and apply connection overrides
    pub fn resolve(&self) -> Result<Config> {
        let mut config = Config::load(self.config.as_deref())?;
        if let Some(host) = &self.host {
            config.host = host.clone();
        }
        if let Some(token) = &self.token {
            config.token = token.clone();
        }
        Ok(config)
    }
}
