// lib/src/storage_engine/inmemory_storage.rs

use async_trait::async_trait;
use tokio::sync::RwLock;

use models::errors::StoreResult;
use models::Snapshot;

use super::storage_engine::SnapshotStorage;
use crate::config::StorageEngineType;

/// Keeps the last persisted snapshot in process memory. Nothing survives the
/// process; useful for tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    persisted: RwLock<Option<Snapshot>>,
    writes: RwLock<u64>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from an existing snapshot, as if it had been written earlier.
    pub fn with_snapshot(snapshot: Snapshot) -> Self {
        InMemoryStorage {
            persisted: RwLock::new(Some(snapshot)),
            writes: RwLock::new(0),
        }
    }

    /// Number of `persist` calls so far.
    pub async fn write_count(&self) -> u64 {
        *self.writes.read().await
    }
}

#[async_trait]
impl SnapshotStorage for InMemoryStorage {
    async fn load(&self) -> StoreResult<Option<Snapshot>> {
        Ok(self.persisted.read().await.clone())
    }

    async fn persist(&self, snapshot: &Snapshot) -> StoreResult<()> {
        *self.persisted.write().await = Some(snapshot.clone());
        *self.writes.write().await += 1;
        Ok(())
    }

    fn location(&self) -> String {
        "<memory>".to_string()
    }

    fn engine_type(&self) -> StorageEngineType {
        StorageEngineType::InMemory
    }
}
