//! Backup command implementation.

use clap::Args;
use std::path::PathBuf;

use crate::backup::BackupRunner;
use crate::cli::ConnectionArgs;
use crate::client::{ExportFormat, OutlineClient};
use crate::config::Config;
use crate::Result;

/// Arguments for the backup command
#[derive(Args, Debug, Default)]
pub struct BackupArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Directory the archive is written to
    #[arg(short, long, env = "OUTLINE_BACKUP_DIR")]
    pub output: Option<PathBuf>,

    /// Export format
    #[arg(short, long, value_enum)]
    pub format: Option<ExportFormat>,

    /// Delay between status checks in milliseconds
    #[arg(long)]
    pub poll_interval_ms: Option<u64>,

    /// Fail after this many status checks instead of waiting forever
    #[arg(long)]
    pub max_polls: Option<u32>,
}

impl BackupArgs {
    /// Resolve the effective configuration for this run
    pub fn config(&self) -> Result<Config> {
        let mut config = self.connection.resolve()?;
        if let Some(output) = &self.output {
            config.backup_dir = output.clone();
        }
        if let Some(format) = self.format {
            config.format = format;
        }
        if let Some(poll_interval_ms) = self.poll_interval_ms {
            config.poll_interval_ms = poll_interval_ms;
        }
        if self.max_polls.is_some() {
            config.max_polls = self.max_polls;
        }
        config.validate()?;
        Ok(config)
    }
}

/// Run the backup command
pub async fn run(args: BackupArgs) -> Result<()> {
    let config = args.config()?;

    println!(
        "Starting {} export: {} -> {}",
        config.format,
        config.host,
        config.backup_dir.display()
    );

    let client = OutlineClient::new(&config.base_url(), &config.token)?;
    let runner = BackupRunner::new(client, config.backup_options());
    let outcome = runner.run().await?;

    println!("Backup completed successfully!");
    println!("  Export job: {}", outcome.job_id);
    println!("  Status checks: {}", outcome.polls);
    println!("  Size: {} bytes", outcome.size);
    println!("Backup saved to: {}", outcome.path.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_parse_backup_flags() {
        let cli = Cli::try_parse_from([
            "outline-backup",
            "backup",
            "--host",
            "docs.example.com",
            "--token",
            "tok",
            "--output",
            "/tmp/out",
            "--format",
            "html",
            "--max-polls",
            "50",
        ])
        .unwrap();

        let Commands::Backup(args) = cli.command else {
            panic!("expected backup command");
        };
        assert_eq!(args.connection.host.as_deref(), Some("docs.example.com"));
        assert_eq!(args.output, Some(PathBuf::from("/tmp/out")));
        assert_eq!(args.format, Some(ExportFormat::Html));
        assert_eq!(args.max_polls, Some(50));
    }

    #[test]
    fn test_flags_override_config_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(
            &path,
            "host = \"file-host\"\ntoken = \"file-token\"\nbackup_dir = \"/from/file\"\nformat = \"json\"\n",
        )
        .unwrap();

        let args = BackupArgs {
            connection: ConnectionArgs {
                config: Some(path),
                host: Some("flag-host".to_string()),
                token: None,
            },
            poll_interval_ms: Some(1000),
            ..BackupArgs::default()
        };

        let config = args.config().unwrap();
        assert_eq!(config.host, "flag-host");
        assert_eq!(config.token, "file-token");
        assert_eq!(config.backup_dir, PathBuf::from("/from/file"));
        assert_eq!(config.format, ExportFormat::Json);
        assert_eq!(config.poll_interval_ms, 1000);
    }

    #[test]
    fn test_missing_token_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "host = \"h\"\n").unwrap();

        let args = BackupArgs {
            connection: ConnectionArgs {
                config: Some(path),
                ..ConnectionArgs::default()
            },
            ..BackupArgs::default()
        };

        assert!(args.config().is_err());
    }
}
