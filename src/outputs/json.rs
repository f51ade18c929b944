//! JSON dataset output.
//!
//! The dataset is a single pretty-printed JSON array of
//! [`Record`](crate::models::Record)s. It is the only contract with the
//! downstream query service, which reloads the whole file on start.
//!
//! # Atomic Replacement
//!
//! The array is written to a temporary sibling file first and then renamed
//! over the target, so readers see either the previous dataset or the new
//! one, never a partial write.

use crate::error::PersistError;
use crate::models::Record;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, error, info, instrument};

/// Replace the dataset at `path` with `records`.
///
/// Creates the parent directory when missing. Any previous dataset is
/// overwritten wholesale.
#[instrument(level = "info", skip_all, fields(path = %path.display(), records = records.len()))]
pub async fn persist(records: &[Record], path: &Path) -> Result<(), PersistError> {
    let json = serde_json::to_string_pretty(records)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .await
            .map_err(|source| PersistError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
    }

    let tmp_path = temp_path(path);
    debug!(tmp = %tmp_path.display(), bytes = json.len(), "Writing dataset to temporary file");
    if let Err(source) = fs::write(&tmp_path, json).await {
        let _ = fs::remove_file(&tmp_path).await;
        return Err(PersistError::Write {
            path: tmp_path,
            source,
        });
    }

    if let Err(source) = fs::rename(&tmp_path, path).await {
        error!(tmp = %tmp_path.display(), error = %source, "Failed to move dataset into place");
        let _ = fs::remove_file(&tmp_path).await;
        return Err(PersistError::Rename {
            from: tmp_path,
            to: path.to_path_buf(),
            source,
        });
    }

    info!("Wrote dataset");
    Ok(())
}

/// `data.json` → `.data.json.<pid>.tmp` in the same directory, so the final
/// rename never crosses filesystems.
fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "dataset".to_string());
    path.with_file_name(format!(".{name}.{}.tmp", std::process::id()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: u64, points: u32) -> Record {
        Record {
            id,
            title: format!("Story {id}"),
            link: Some(format!("https://example.com/{id}")),
            points,
            author: Some("alice".to_string()),
            comments: 0,
            time: None,
        }
    }

    #[tokio::test]
    async fn test_persist_writes_pretty_json_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");

        persist(&[record(1, 10), record(2, 20)], &path).await.unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.starts_with("[\n  {\n    \"id\": 1,"));
        let back: Vec<Record> = serde_json::from_str(&raw).unwrap();
        assert_eq!(back, vec![record(1, 10), record(2, 20)]);
    }

    #[tokio::test]
    async fn test_persist_overwrites_previous_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");

        persist(&[record(1, 10), record(2, 20), record(3, 30)], &path)
            .await
            .unwrap();
        persist(&[record(9, 90)], &path).await.unwrap();

        let back: Vec<Record> =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(back, vec![record(9, 90)]);
    }

    #[tokio::test]
    async fn test_persist_leaves_no_temporary_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("data.json");

        persist(&[], &path).await.unwrap();

        let entries: Vec<_> = std::fs::read_dir(path.parent().unwrap())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("data.json")]);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]");
    }

    #[tokio::test]
    async fn test_persist_into_directory_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = persist(&[record(1, 1)], dir.path()).await.unwrap_err();
        assert!(matches!(err, PersistError::Rename { .. }));
    }

    #[test]
    fn test_temp_path_is_sibling() {
        let tmp = temp_path(Path::new("/srv/data/data.json"));
        assert_eq!(tmp.parent(), Some(Path::new("/srv/data")));
        assert!(tmp.file_name().unwrap().to_string_lossy().ends_with(".tmp"));
    }
}
