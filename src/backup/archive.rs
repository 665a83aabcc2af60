//! Persisting downloaded export archives.

use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, warn};

use crate::Result;

/// Build the archive filename for a given wall-clock time
pub fn backup_filename(at: DateTime<Local>) -> String {
    format!("backup_{}.zip", at.format("%Y%m%d_%H%M%S"))
}

/// Write `data` to a new timestamped archive inside `backup_dir`.
///
/// The directory tree is created if missing. Bytes land in a `.part`
/// sibling first and are renamed into place once fully written.
pub async fn save_archive(data: &[u8], backup_dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(backup_dir).await?;

    let filename = backup_filename(Local::now());
    let path = backup_dir.join(&filename);
    let partial = backup_dir.join(format!("{filename}.part"));

    if let Err(e) = fs::write(&partial, data).await {
        if let Err(cleanup) = fs::remove_file(&partial).await {
            warn!("Could not remove partial file {}: {}", partial.display(), cleanup);
        }
        return Err(e.into());
    }
    fs::rename(&partial, &path).await?;

    info!("File saved successfully to: {}", path.display());
    Ok(path)
}

/// True when `name` looks like `backup_YYYYMMDD_HHMMSS.zip`
#[cfg(test)]
pub(crate) fn is_backup_filename(name: &str) -> bool {
    let Some(stamp) = name
        .strip_prefix("backup_")
        .and_then(|rest| rest.strip_suffix(".zip"))
    else {
        return false;
    };
    let bytes = stamp.as_bytes();
    bytes.len() == 15
        && bytes[8] == b'_'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 8 || b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_backup_filename_format() {
        let at = Local.with_ymd_and_hms(2024, 3, 7, 9, 5, 2).unwrap();
        assert_eq!(backup_filename(at), "backup_20240307_090502.zip");
        assert!(is_backup_filename(&backup_filename(at)));
    }

    #[test]
    fn test_filename_pattern() {
        assert!(is_backup_filename("backup_20991231_235959.zip"));
        assert!(!is_backup_filename("backup_2099123_235959.zip"));
        assert!(!is_backup_filename("backup_20991231-235959.zip"));
        assert!(!is_backup_filename("backup_20991231_235959.zip.part"));
    }

    #[tokio::test]
    async fn test_save_archive_creates_nested_dir() {
        let temp_dir = TempDir::new().unwrap();
        let backup_dir = temp_dir.path().join("nested").join("backups");

        let path = save_archive(b"archive-bytes", &backup_dir).await.unwrap();

        assert_eq!(path.parent().unwrap(), backup_dir.as_path());
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(is_backup_filename(name), "unexpected name {name}");
        assert_eq!(std::fs::read(&path).unwrap(), b"archive-bytes");

        // Only the final archive remains
        let entries: Vec<_> = std::fs::read_dir(&backup_dir).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }
}
