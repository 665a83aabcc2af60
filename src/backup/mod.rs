//! Backup workflow: request an export, wait for it, save the archive.
//!
//! The runner drives the job through its states by polling at a fixed
//! interval. Nothing is downloaded until the server reports `complete`,
//! and a reported `error` ends the run without touching the backup
//! directory.

pub mod archive;

use std::path::PathBuf;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::client::{ExportFormat, ExportService, JobState};
use crate::error::{ApiError, Result};

pub use archive::{backup_filename, save_archive};

/// Delay between two status checks
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(300);

/// Options for a backup run
#[derive(Debug, Clone)]
pub struct BackupOptions {
    /// Directory the archive is written to
    pub backup_dir: PathBuf,
    /// Export format requested from the server
    pub format: ExportFormat,
    /// Delay before each status check
    pub poll_interval: Duration,
    /// Give up after this many status checks (unbounded when `None`)
    pub max_polls: Option<u32>,
}

impl BackupOptions {
    pub fn new(backup_dir: impl Into<PathBuf>) -> Self {
        Self {
            backup_dir: backup_dir.into(),
            format: ExportFormat::default(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_polls: None,
        }
    }

    pub fn with_format(mut self, format: ExportFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn with_max_polls(mut self, max_polls: Option<u32>) -> Self {
        self.max_polls = max_polls;
        self
    }
}

/// Result of a successful run
#[derive(Debug, Clone)]
pub struct BackupOutcome {
    pub job_id: String,
    pub path: PathBuf,
    pub size: usize,
    /// Status checks performed after the initial export request
    pub polls: u32,
}

/// Runs one export-and-download cycle against an [`ExportService`]
pub struct BackupRunner<S> {
    service: S,
    options: BackupOptions,
}

impl<S: ExportService> BackupRunner<S> {
    pub fn new(service: S, options: BackupOptions) -> Self {
        Self { service, options }
    }

    pub fn options(&self) -> &BackupOptions {
        &self.options
    }

    /// Request an export, wait for completion and save the archive
    pub async fn run(&self) -> Result<BackupOutcome> {
        let operation = self.service.start_export(self.options.format).await?;
        info!("Export job created with ID: {}", operation.id);
        info!("Initial state: {}", operation.state);

        if operation.state == JobState::Complete {
            info!("Export is already complete. Downloading immediately.");
        }

        let polls = self.wait_for_completion(&operation.id, operation.state).await?;

        let data = self.service.fetch_archive(&operation.id).await?;
        debug!(job_id = %operation.id, size = data.len(), "Archive downloaded");

        let path = save_archive(&data, &self.options.backup_dir).await?;

        Ok(BackupOutcome {
            job_id: operation.id,
            path,
            size: data.len(),
            polls,
        })
    }

    /// Poll until the job is complete, returning the number of status checks
    async fn wait_for_completion(&self, job_id: &str, initial: JobState) -> Result<u32> {
        let mut state = initial;
        let mut polls = 0u32;

        loop {
            match state {
                JobState::Complete => return Ok(polls),
                JobState::Error => {
                    warn!(job_id, "Export failed on the server side");
                    return Err(ApiError::ExportFailed {
                        job_id: job_id.to_string(),
                    }
                    .into());
                }
                JobState::Pending(_) => {}
            }

            if let Some(max_polls) = self.options.max_polls {
                if polls >= max_polls {
                    return Err(ApiError::PollLimitExceeded {
                        job_id: job_id.to_string(),
                        polls,
                    }
                    .into());
                }
            }

            sleep(self.options.poll_interval).await;
            state = self.service.export_state(job_id).await?;
            polls += 1;

            info!("Current state: {}", state);
            if state == JobState::Complete {
                info!("Export completed successfully!");
            }
        }
    }
}
