// lib/src/storage_engine/mod.rs

pub mod inmemory_storage;
pub mod json_file_storage;
pub mod storage_engine;

pub use inmemory_storage::InMemoryStorage;
pub use json_file_storage::JsonFileStorage;
pub use storage_engine::SnapshotStorage;

use std::sync::Arc;

use crate::config::{StorageEngineType, StoreConfig};

/// Creates the snapshot storage selected by `config`.
pub fn create_storage(config: &StoreConfig) -> Arc<dyn SnapshotStorage> {
    match config.storage_engine_type {
        StorageEngineType::JsonFile => Arc::new(JsonFileStorage::new(config.database_path())),
        StorageEngineType::InMemory => Arc::new(InMemoryStorage::new()),
    }
}
