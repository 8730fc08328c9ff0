// lib/src/storage_engine/storage_engine.rs

use async_trait::async_trait;

use models::errors::StoreResult;
use models::Snapshot;

use crate::config::StorageEngineType;

/// Persistence seam for the document store. An engine only ever sees whole
/// snapshots: it loads the last one written and overwrites it on every
/// mutation.
#[async_trait]
pub trait SnapshotStorage: Send + Sync + 'static {
    /// Reads the persisted snapshot. `Ok(None)` means nothing usable has been
    /// written yet (missing file, zero bytes, whitespace or `null`).
    async fn load(&self) -> StoreResult<Option<Snapshot>>;

    /// Replaces the persisted snapshot with `snapshot`. Either the whole
    /// snapshot is written or an error is returned.
    async fn persist(&self, snapshot: &Snapshot) -> StoreResult<()>;

    /// Human-readable location, for logs.
    fn location(&self) -> String;

    fn engine_type(&self) -> StorageEngineType;
}
