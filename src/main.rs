//! outline-backup - export an Outline workspace to a local archive
//!
//! Main binary entry point for the command-line interface.

use anyhow::Context;
use clap::Parser;
use outline_backup::cli::{Cli, Commands};
use outline_backup::logging::init_logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    match cli.command {
        Commands::Backup(args) => outline_backup::cli::backup::run(args)
            .await
            .context("Failed to create backup"),
        Commands::Status(args) => outline_backup::cli::status::run(args)
            .await
            .context("Failed to check export status"),
    }
}
