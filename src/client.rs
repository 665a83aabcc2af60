//! HTTP client for the Outline export API.
//!
//! Three calls make up an export: `collections.export_all` starts a file
//! operation, `fileOperations.info` reports its state, and
//! `fileOperations.redirect` hands back a signed URL for the finished archive.

use async_trait::async_trait;
use reqwest::{header, redirect, Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::error::{ApiError, Result};

const EXPORT_ENDPOINT: &str = "/api/collections.export_all";
const INFO_ENDPOINT: &str = "/api/fileOperations.info";
const REDIRECT_ENDPOINT: &str = "/api/fileOperations.redirect";

/// Archive format requested from the server
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ExportFormat {
    /// Markdown files grouped by collection
    #[default]
    OutlineMarkdown,
    /// Outline's JSON export, suitable for re-import
    Json,
    /// Rendered HTML pages
    Html,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::OutlineMarkdown => "outline-markdown",
            ExportFormat::Json => "json",
            ExportFormat::Html => "html",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Server-side state of an export job.
///
/// Only `complete` and `error` are terminal; anything else the server
/// reports (`creating`, `uploading`, ...) is kept verbatim as pending.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum JobState {
    Complete,
    Error,
    Pending(String),
}

impl JobState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, JobState::Pending(_))
    }
}

impl From<String> for JobState {
    fn from(value: String) -> Self {
        match value.as_str() {
            "complete" => JobState::Complete,
            "error" => JobState::Error,
            _ => JobState::Pending(value),
        }
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobState::Complete => f.write_str("complete"),
            JobState::Error => f.write_str("error"),
            JobState::Pending(state) => f.write_str(state),
        }
    }
}

/// Export job as returned by `collections.export_all`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FileOperation {
    pub id: String,
    pub state: JobState,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExportResponse {
    pub data: ExportData,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportData {
    pub file_operation: FileOperation,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatusResponse {
    pub data: FileOperationInfo,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FileOperationInfo {
    pub state: JobState,
}

#[derive(Serialize)]
struct ExportRequest {
    format: ExportFormat,
}

#[derive(Serialize)]
struct InfoRequest<'a> {
    id: &'a str,
}

/// The three export operations the backup workflow depends on
#[async_trait]
pub trait ExportService: Send + Sync {
    /// Start a new export and return the created job
    async fn start_export(&self, format: ExportFormat) -> Result<FileOperation>;

    /// Fetch the current state of a job
    async fn export_state(&self, job_id: &str) -> Result<JobState>;

    /// Download the finished archive of a job
    async fn fetch_archive(&self, job_id: &str) -> Result<Vec<u8>>;
}

/// Bearer-authenticated client for a single Outline instance
pub struct OutlineClient {
    http: Client,
    no_redirect: Client,
    base_url: String,
    token: String,
}

impl OutlineClient {
    /// Create a client for `base_url` (e.g. `https://docs.example.com`)
    pub fn new(base_url: &str, token: &str) -> Result<Self> {
        let http = Client::builder().build()?;
        let no_redirect = Client::builder().redirect(redirect::Policy::none()).build()?;

        Ok(Self {
            http,
            no_redirect,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    async fn post_json<B, T>(&self, operation: &'static str, endpoint: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let resp = self
            .http
            .post(self.url(endpoint))
            .bearer_auth(&self.token)
            .json(body)
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;

        if status != StatusCode::OK {
            return Err(ApiError::UnexpectedStatus {
                operation,
                status: status.as_u16(),
                body: text,
            }
            .into());
        }

        serde_json::from_str(&text).map_err(|e| {
            ApiError::InvalidResponse {
                operation,
                reason: e.to_string(),
            }
            .into()
        })
    }

    /// POST `collections.export_all`
    pub async fn request_export(&self, format: ExportFormat) -> Result<ExportResponse> {
        debug!(%format, "Requesting export");
        self.post_json("Export", EXPORT_ENDPOINT, &ExportRequest { format })
            .await
    }

    /// POST `fileOperations.info`
    pub async fn check_export_status(&self, job_id: &str) -> Result<StatusResponse> {
        self.post_json("Status check", INFO_ENDPOINT, &InfoRequest { id: job_id })
            .await
    }

    /// Resolve the signed archive URL and download it.
    ///
    /// The redirect endpoint must answer 302 with a `Location`; the target
    /// is then fetched with the same bearer header and must answer 200.
    pub async fn download_file(&self, job_id: &str) -> Result<Vec<u8>> {
        let resp = self
            .no_redirect
            .get(self.url(REDIRECT_ENDPOINT))
            .query(&[("id", job_id)])
            .bearer_auth(&self.token)
            .send()
            .await?;

        let status = resp.status();
        if status != StatusCode::FOUND {
            let body = resp.text().await.unwrap_or_default();
            return Err(ApiError::UnexpectedRedirect {
                status: status.as_u16(),
                body,
            }
            .into());
        }

        let location = resp
            .headers()
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok())
            .filter(|value| !value.is_empty())
            .ok_or(ApiError::MissingLocation)?;

        // Location may be relative to the redirect endpoint
        let download_url = resp
            .url()
            .join(location)
            .map_err(|e| ApiError::InvalidResponse {
                operation: "Redirect",
                reason: format!("bad Location header {location:?}: {e}"),
            })?;

        debug!(
            host = download_url.host_str().unwrap_or_default(),
            "Following export redirect"
        );

        let file = self
            .http
            .get(download_url)
            .bearer_auth(&self.token)
            .send()
            .await?;

        let status = file.status();
        if status != StatusCode::OK {
            let body = file.text().await.unwrap_or_default();
            return Err(ApiError::DownloadFailed {
                status: status.as_u16(),
                body,
            }
            .into());
        }

        Ok(file.bytes().await?.to_vec())
    }
}

#[async_trait]
impl ExportService for OutlineClient {
    async fn start_export(&self, format: ExportFormat) -> Result<FileOperation> {
        Ok(self.request_export(format).await?.data.file_operation)
    }

    async fn export_state(&self, job_id: &str) -> Result<JobState> {
        Ok(self.check_export_status(job_id).await?.data.state)
    }

    async fn fetch_archive(&self, job_id: &str) -> Result<Vec<u8>> {
        self.download_file(job_id).await
    }
}
