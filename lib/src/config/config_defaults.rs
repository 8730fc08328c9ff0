// lib/src/config/config_defaults.rs

use std::path::PathBuf;

use crate::config::config_constants::*;
use crate::config::config_structs::StorageEngineType;

/// Per-user application data directory, the way a desktop shell resolves its
/// "userData" location. Falls back to a relative directory when the platform
/// has no such concept.
pub fn default_data_directory() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIRECTORY_NAME))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIRECTORY))
}

pub fn default_database_file() -> String {
    DEFAULT_DATABASE_FILE.to_string()
}

pub fn default_storage_engine_type() -> StorageEngineType {
    StorageEngineType::JsonFile
}

pub fn default_latest_limit() -> usize {
    DEFAULT_LATEST_LIMIT
}
