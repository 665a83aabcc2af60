//! Configuration for outline-backup.
//!
//! Settings come from an optional TOML file; command-line flags and
//! environment variables are applied on top by the CLI layer.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::backup::BackupOptions;
use crate::client::ExportFormat;
use crate::{Error, Result};

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Outline host, e.g. `docs.example.com`
    pub host: String,
    /// API token sent as a bearer credential
    pub token: String,
    pub backup_dir: PathBuf,
    pub format: ExportFormat,
    pub poll_interval_ms: u64,
    pub max_polls: Option<u32>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: String::new(),
            token: String::new(),
            backup_dir: PathBuf::from("./backups"),
            format: ExportFormat::default(),
            poll_interval_ms: 300,
            max_polls: None,
        }
    }
}

// Hand-written so the token never ends up in logs
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("host", &self.host)
            .field("token", &"<redacted>")
            .field("backup_dir", &self.backup_dir)
            .field("format", &self.format)
            .field("poll_interval_ms", &self.poll_interval_ms)
            .field("max_polls", &self.max_polls)
            .finish()
    }
}

impl Config {
    /// Load config from `path`, or from the default location when `None`.
    ///
    /// An explicit path must exist; a missing default file yields defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match Self::default_path() {
                Some(path) if path.exists() => path,
                _ => {
                    debug!("No config file found, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        debug!("Loading config from {}", path.display());
        let content = fs::read_to_string(&path).map_err(|e| Error::Config {
            reason: format!("Failed to read {}: {}", path.display(), e),
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config {
            reason: format!("Failed to parse config: {}", e),
        })
    }

    /// `<config_dir>/outline-backup/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("outline-backup").join("config.toml"))
    }

    /// Base URL for API calls; bare hosts are served over https
    pub fn base_url(&self) -> String {
        let host = self.host.trim().trim_end_matches('/');
        if host.starts_with("https://") || host.starts_with("http://") {
            host.to_string()
        } else {
            format!("https://{host}")
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn backup_options(&self) -> BackupOptions {
        BackupOptions::new(&self.backup_dir)
            .with_format(self.format)
            .with_poll_interval(self.poll_interval())
            .with_max_polls(self.max_polls)
    }

    /// Validate config settings
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(Error::Config {
                reason: "host is not set (use --host or OUTLINE_HOST)".to_string(),
            });
        }
        if self.token.trim().is_empty() {
            return Err(Error::Config {
                reason: "token is not set (use --token or OUTLINE_TOKEN)".to_string(),
            });
        }
        if self.poll_interval_ms == 0 {
            return Err(Error::Config {
                reason: "poll_interval_ms must be greater than 0".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn valid() -> Config {
        Config {
            host: "docs.example.com".to_string(),
            token: "abc".to_string(),
            ..Config::default()
        }
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.backup_dir, PathBuf::from("./backups"));
        assert_eq!(config.format, ExportFormat::OutlineMarkdown);
        assert_eq!(config.poll_interval(), Duration::from_millis(300));
        assert_eq!(config.max_polls, None);
    }

    #[test]
    fn test_parse_partial_toml() {
        let config = Config::from_toml_str(
            r#"
host = "wiki.internal"
token = "t0k"
format = "json"
max_polls = 200
"#,
        )
        .unwrap();

        assert_eq!(config.host, "wiki.internal");
        assert_eq!(config.format, ExportFormat::Json);
        assert_eq!(config.max_polls, Some(200));
        assert_eq!(config.poll_interval_ms, 300);
    }

    #[test]
    fn test_invalid_toml() {
        let err = Config::from_toml_str("format = \"pdf\"").unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn test_load_explicit_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "host = \"h\"\ntoken = \"t\"\nbackup_dir = \"/var/backups\"\n").unwrap();

        let config = Config::load(Some(path.as_path())).unwrap();
        assert_eq!(config.backup_dir, PathBuf::from("/var/backups"));

        let missing = temp_dir.path().join("missing.toml");
        assert!(matches!(Config::load(Some(missing.as_path())), Err(Error::Config { .. })));
    }

    #[test]
    fn test_base_url() {
        let mut config = valid();
        assert_eq!(config.base_url(), "https://docs.example.com");

        config.host = "http://127.0.0.1:8080/".to_string();
        assert_eq!(config.base_url(), "http://127.0.0.1:8080");
    }

    #[test]
    fn test_validation() {
        assert!(valid().validate().is_ok());

        let mut config = valid();
        config.token = "  ".to_string();
        assert!(config.validate().is_err());

        let mut config = valid();
        config.host.clear();
        assert!(config.validate().is_err());

        let mut config = valid();
        config.poll_interval_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_debug_redacts_token() {
        let rendered = format!("{:?}", valid());
        assert!(!rendered.contains("abc"));
        assert!(rendered.contains("<redacted>"));
    }
}
