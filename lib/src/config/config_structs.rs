// lib/src/config/config_structs.rs

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::config_defaults::*;

/// Which snapshot backend a `Database` writes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageEngineType {
    JsonFile,
    InMemory,
}

impl FromStr for StorageEngineType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json_file" | "json-file" | "json" | "file" => Ok(StorageEngineType::JsonFile),
            "in_memory" | "in-memory" | "inmemory" | "memory" => Ok(StorageEngineType::InMemory),
            _ => Err(anyhow::anyhow!("Unknown storage engine type: {}", s)),
        }
    }
}

impl fmt::Display for StorageEngineType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageEngineType::JsonFile => write!(f, "json_file"),
            StorageEngineType::InMemory => write!(f, "in_memory"),
        }
    }
}

/// Store configuration, mirroring the `store:` section of `synapss_config.yaml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_data_directory")]
    pub data_directory: PathBuf,
    #[serde(default = "default_database_file")]
    pub database_file: String,
    #[serde(default = "default_storage_engine_type")]
    pub storage_engine_type: StorageEngineType,
    #[serde(default = "default_latest_limit")]
    pub default_latest_limit: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            data_directory: default_data_directory(),
            database_file: default_database_file(),
            storage_engine_type: default_storage_engine_type(),
            default_latest_limit: default_latest_limit(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct StoreConfigWrapper {
    pub store: StoreConfig,
}

/// Flags read from the process environment before anything else runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StartupFlags {
    /// Wipe the store and terminate instead of continuing.
    pub clear_db: bool,
}
