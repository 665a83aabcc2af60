//! # outline-backup
//!
//! Backs up an Outline workspace by asking the server for a bulk export,
//! waiting for the export job to finish and saving the resulting archive
//! as `backup_<YYYYMMDD_HHMMSS>.zip`.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use outline_backup::backup::{BackupOptions, BackupRunner};
//! use outline_backup::client::OutlineClient;
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let client = OutlineClient::new("https://docs.example.com", "api-token")?;
//! let runner = BackupRunner::new(client, BackupOptions::new("./backups"));
//!
//! let outcome = runner.run().await?;
//! println!("Backup saved to: {}", outcome.path.display());
//! # Ok(())
//! # }
//! ```

pub mod backup;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod logging;

// Re-export commonly used types
pub use backup::{BackupOptions, BackupOutcome, BackupRunner};
pub use client::{ExportFormat, ExportService, JobState, OutlineClient};
pub use config::Config;
pub use error::{ApiError, Error, Result};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
