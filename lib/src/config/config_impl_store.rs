// lib/src/config/config_impl_store.rs

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use log::{debug, info};
use serde_yaml2 as serde_yaml;

use models::errors::StoreError;

use crate::config::config_constants::*;
use crate::config::config_structs::{StartupFlags, StoreConfig, StoreConfigWrapper};

impl StoreConfig {
    /// Resolves the configuration: defaults, then the YAML file, then the
    /// environment. An explicit `path` must exist; the default file is
    /// optional.
    pub async fn load(path: Option<&Path>) -> Result<StoreConfig> {
        let (path, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        };

        let config = if path.exists() {
            let content = tokio::fs::read_to_string(&path)
                .await
                .context(format!("Failed to read store config file: {}", path.display()))?;
            let config = StoreConfig::from_yaml_str(&content)
                .context(format!("Failed to parse store config file: {}", path.display()))?;
            info!("Loaded store configuration from {:?}", path);
            config
        } else if required {
            return Err(anyhow!("Config file not found at {}", path.display()));
        } else {
            debug!("No config file at {:?}, using defaults", path);
            StoreConfig::default()
        };

        let config = config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate().context("Failed to validate store configuration")
    }

    pub fn from_yaml_str(content: &str) -> Result<StoreConfig> {
        if content.trim().is_empty() {
            return Ok(StoreConfig::default());
        }
        let wrapper: StoreConfigWrapper =
            serde_yaml::from_str(content).map_err(|e| anyhow!("Invalid YAML: {}", e))?;
        Ok(wrapper.store)
    }

    /// Applies `SYNAPSS_*` overrides looked up through `lookup`.
    pub fn apply_overrides<F>(mut self, lookup: F) -> Result<StoreConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup(ENV_DATA_DIRECTORY).filter(|v| !v.trim().is_empty()) {
            debug!("{} overrides data directory: {}", ENV_DATA_DIRECTORY, dir);
            self.data_directory = PathBuf::from(dir);
        }
        if let Some(file) = lookup(ENV_DATABASE_FILE).filter(|v| !v.trim().is_empty()) {
            debug!("{} overrides database file: {}", ENV_DATABASE_FILE, file);
            self.database_file = file;
        }
        if let Some(engine) = lookup(ENV_STORAGE_ENGINE).filter(|v| !v.trim().is_empty()) {
            self.storage_engine_type = engine.parse()?;
        }
        Ok(self)
    }

    pub fn validate(self) -> Result<StoreConfig, StoreError> {
        let file = self.database_file.trim();
        if file.is_empty() {
            return Err(StoreError::ConfigurationError("database_file must not be empty".to_string()));
        }
        if file.contains('/') || file.contains('\\') || file == "." || file == ".." {
            return Err(StoreError::ConfigurationError(format!(
                "database_file must be a plain file name, got '{}'",
                self.database_file
            )));
        }
        if self.default_latest_limit == 0 {
            return Err(StoreError::ConfigurationError("default_latest_limit must be positive".to_string()));
        }
        Ok(self)
    }

    /// Full path of the snapshot file.
    pub fn database_path(&self) -> PathBuf {
        self.data_directory.join(&self.database_file)
    }
}

impl StartupFlags {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Only the exact value `true` arms `CLEAR_DB`.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        StartupFlags {
            clear_db: lookup(ENV_CLEAR_DB).as_deref() == Some("true"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StorageEngineType;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn should_parse_partial_yaml() {
        let yaml = "store:\n  data_directory: /var/lib/synapss\n  storage_engine_type: in_memory\n";
        let config = StoreConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.data_directory, PathBuf::from("/var/lib/synapss"));
        assert_eq!(config.storage_engine_type, StorageEngineType::InMemory);
        assert_eq!(config.database_file, DEFAULT_DATABASE_FILE);
        assert_eq!(config.default_latest_limit, DEFAULT_LATEST_LIMIT);
    }

    #[test]
    fn environment_overrides_file_values() {
        let vars = env(&[(ENV_DATA_DIRECTORY, "/tmp/synapss"), (ENV_DATABASE_FILE, "clinic.json")]);
        let config = StoreConfig::default()
            .apply_overrides(|key| vars.get(key).cloned())
            .unwrap();
        assert_eq!(config.database_path(), PathBuf::from("/tmp/synapss/clinic.json"));
    }

    #[test]
    fn should_reject_unknown_engine_override() {
        let vars = env(&[(ENV_STORAGE_ENGINE, "cassandra")]);
        assert!(StoreConfig::default().apply_overrides(|key| vars.get(key).cloned()).is_err());
    }

    #[test]
    fn validate_rejects_paths_as_file_names() {
        let mut config = StoreConfig::default();
        config.database_file = "../escape.json".to_string();
        assert!(matches!(config.validate(), Err(StoreError::ConfigurationError(_))));

        let mut config = StoreConfig::default();
        config.database_file = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn clear_db_requires_exact_true() {
        let on = env(&[(ENV_CLEAR_DB, "true")]);
        let off = env(&[(ENV_CLEAR_DB, "TRUE")]);
        assert!(StartupFlags::from_lookup(|k| on.get(k).cloned()).clear_db);
        assert!(!StartupFlags::from_lookup(|k| off.get(k).cloned()).clear_db);
        assert!(!StartupFlags::from_lookup(|_| None).clear_db);
    }

    #[tokio::test]
    async fn explicit_missing_config_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.yaml");
        assert!(StoreConfig::load(Some(&missing)).await.is_err());
    }
}
