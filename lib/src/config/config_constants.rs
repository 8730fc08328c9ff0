// lib/src/config/config_constants.rs

pub const APP_DIRECTORY_NAME: &str = "synapss";
pub const DEFAULT_DATA_DIRECTORY: &str = "./data";
pub const DEFAULT_DATABASE_FILE: &str = "database.json";
pub const DEFAULT_CONFIG_FILE: &str = "synapss_config.yaml";
pub const DEFAULT_LATEST_LIMIT: usize = 5;

pub const ENV_DATA_DIRECTORY: &str = "SYNAPSS_DATA_DIR";
pub const ENV_DATABASE_FILE: &str = "SYNAPSS_DB_FILE";
pub const ENV_STORAGE_ENGINE: &str = "SYNAPSS_STORAGE_ENGINE";
pub const ENV_CLEAR_DB: &str = "CLEAR_DB";
