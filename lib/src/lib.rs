// lib/src/lib.rs

pub mod clock;
pub mod config;
pub mod database;
pub mod storage_engine;

pub use crate::clock::{Clock, ManualClock, SystemClock};
pub use crate::config::{StartupFlags, StorageEngineType, StoreConfig};
pub use crate::database::Database;
pub use crate::storage_engine::{create_storage, InMemoryStorage, JsonFileStorage, SnapshotStorage};

pub use models;
