//! Error types for outline-backup

use thiserror::Error;

/// Failures reported by, or about, the remote export API.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{operation} request failed. Status code: {status}, Response: {body}")]
    UnexpectedStatus {
        operation: &'static str,
        status: u16,
        body: String,
    },

    #[error("Expected 302 redirect, got {status}. Response: {body}")]
    UnexpectedRedirect { status: u16, body: String },

    #[error("Redirect location not found in headers")]
    MissingLocation,

    #[error("File download failed. Status code: {status}, Response: {body}")]
    DownloadFailed { status: u16, body: String },

    #[error("Export {job_id} failed on the server side")]
    ExportFailed { job_id: String },

    #[error("Export {job_id} still pending after {polls} status checks")]
    PollLimitExceeded { job_id: String, polls: u32 },

    #[error("Invalid {operation} response: {reason}")]
    InvalidResponse {
        operation: &'static str,
        reason: String,
    },
}

/// Main error type for outline-backup operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {reason}")]
    Config { reason: String },
}

/// Result type alias for outline-backup operations
pub type Result<T> = std::result::Result<T, Error>;
