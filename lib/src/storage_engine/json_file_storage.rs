// lib/src/storage_engine/json_file_storage.rs

use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use log::{debug, warn};
use tempfile::NamedTempFile;

use models::errors::{StoreError, StoreResult};
use models::Snapshot;

use super::storage_engine::SnapshotStorage;
use crate::config::StorageEngineType;

/// Snapshot storage backed by one pretty-printed JSON file.
///
/// Writes go to a temporary file in the target's directory which is then
/// renamed over the target, so a crash mid-write leaves the previous snapshot
/// intact.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        JsonFileStorage { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn parent_dir(&self) -> PathBuf {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }
}

/// Decodes file contents. Blank content and a literal `null` count as "never
/// written".
pub fn decode_snapshot(content: &str) -> StoreResult<Option<Snapshot>> {
    let trimmed = content.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(None);
    }
    serde_json::from_str(trimmed)
        .map(Some)
        .map_err(|e| StoreError::DeserializationError(format!("Failed to decode snapshot: {}", e)))
}

fn write_atomically(dir: &Path, target: &Path, bytes: &[u8]) -> StoreResult<()> {
    std::fs::create_dir_all(dir)?;
    let mut temp = NamedTempFile::new_in(dir)?;
    temp.write_all(bytes)?;
    temp.as_file().sync_all()?;
    temp.persist(target).map_err(|e| StoreError::Io(e.error))?;
    Ok(())
}

#[async_trait]
impl SnapshotStorage for JsonFileStorage {
    async fn load(&self) -> StoreResult<Option<Snapshot>> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No snapshot at {:?} yet", self.path);
                return Ok(None);
            }
            Err(e) => return Err(StoreError::Io(e)),
        };
        decode_snapshot(&content).map_err(|e| {
            warn!("Snapshot at {:?} could not be decoded: {}", self.path, e);
            e
        })
    }

    async fn persist(&self, snapshot: &Snapshot) -> StoreResult<()> {
        let bytes = serde_json::to_vec_pretty(snapshot)
            .map_err(|e| StoreError::SerializationError(format!("Failed to encode snapshot: {}", e)))?;
        let dir = self.parent_dir();
        let target = self.path.clone();
        let written = bytes.len();
        tokio::task::spawn_blocking(move || write_atomically(&dir, &target, &bytes))
            .await
            .map_err(|e| StoreError::InternalError(format!("Snapshot writer task failed: {}", e)))??;
        debug!("Wrote {} bytes to {:?}", written, self.path);
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }

    fn engine_type(&self) -> StorageEngineType {
        StorageEngineType::JsonFile
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_file_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonFileStorage::new(dir.path().join("database.json"));
        assert!(storage.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn blank_and_null_files_load_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("database.json");
        std::fs::write(&path, "  \n").unwrap();
        assert!(JsonFileStorage::new(&path).load().await.unwrap().is_none());
        std::fs::write(&path, "null").unwrap();
        assert!(JsonFileStorage::new(&path).load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn should_create_missing_directories_on_persist() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("store").join("database.json");
        let storage = JsonFileStorage::new(&path);
        storage.persist(&Snapshot::default()).await.unwrap();

        let written: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written, serde_json::json!({"patients": [], "assessments": []}));
        assert_eq!(storage.load().await.unwrap(), Some(Snapshot::default()));
    }

    #[tokio::test]
    async fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("database.json");
        std::fs::write(&path, "{\"patients\": [").unwrap();
        let err = JsonFileStorage::new(&path).load().await.unwrap_err();
        assert!(matches!(err, StoreError::DeserializationError(_)));
    }
}
