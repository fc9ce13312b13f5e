//! Configuration Loader
//!
//! Environment-aware configuration loading on top of the `config` crate.

use super::ChecklistConfig;
use crate::error::{ChecklistError, Result};
use config::{Config, Environment, File};
use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Loaded configuration together with where it came from
#[derive(Debug)]
pub struct ConfigManager {
    config: ChecklistConfig,
    environment: String,
    config_directory: PathBuf,
}

impl ConfigManager {
    /// Load configuration with environment auto-detection
    pub fn load() -> Result<Arc<ConfigManager>> {
        Self::load_from_directory(None)
    }

    /// Load configuration from a specific directory
    pub fn load_from_directory(config_dir: Option<PathBuf>) -> Result<Arc<ConfigManager>> {
        let environment = Self::detect_environment();
        Self::load_from_directory_with_env(config_dir, &environment)
    }

    /// Load configuration from a specific directory with explicit environment
    pub fn load_from_directory_with_env(
        config_dir: Option<PathBuf>,
        environment: &str,
    ) -> Result<Arc<ConfigManager>> {
        let config_directory = config_dir.unwrap_or_else(Self::default_config_directory);

        debug!(
            "Loading configuration for environment '{}' from directory: {}",
            environment,
            config_directory.display()
        );

        let config = Self::load_and_merge_config(&config_directory, environment)?;
        config.validate()?;

        info!(
            environment = %environment,
            store_backend = ?config.store.backend,
            bind_address = %config.web.bind_address,
            "Configuration loaded successfully"
        );

        Ok(Arc::new(ConfigManager {
            config,
            environment: environment.to_string(),
            config_directory,
        }))
    }

    /// Wrap an already built configuration, e.g. in tests
    pub fn from_config(config: ChecklistConfig) -> Result<Arc<ConfigManager>> {
        config.validate()?;
        let environment = config.environment.clone();
        Ok(Arc::new(ConfigManager {
            config,
            environment,
            config_directory: Self::default_config_directory(),
        }))
    }

    pub fn config(&self) -> &ChecklistConfig {
        &self.config
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    pub fn config_directory(&self) -> &Path {
        &self.config_directory
    }

    /// Current environment from `CHECKLIST_ENV`, then `APP_ENV`
    pub fn detect_environment() -> String {
        env::var("CHECKLIST_ENV")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string())
    }

    fn default_config_directory() -> PathBuf {
        env::var("CHECKLIST_CONFIG_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config"))
    }

    fn load_and_merge_config(config_directory: &Path, environment: &str) -> Result<ChecklistConfig> {
        let base_file = config_directory.join("checklist.toml");
        let env_file = config_directory.join(format!("checklist.{environment}.toml"));

        let settings = Config::builder()
            .set_default("environment", environment)
            .map_err(config_error)?
            .add_source(File::from(base_file).required(false))
            .add_source(File::from(env_file).required(false))
            .add_source(
                Environment::with_prefix("CHECKLIST")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(config_error)?;

        let mut config: ChecklistConfig = settings.try_deserialize().map_err(config_error)?;

        if let Ok(database_url) = env::var("DATABASE_URL") {
            config.database.url = database_url;
        }

        Ok(config)
    }
}

fn config_error(err: config::ConfigError) -> ChecklistError {
    ChecklistError::Configuration(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreBackend;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_missing_directory_falls_back_to_defaults() {
        let dir = TempDir::new().expect("temp dir");
        let manager = ConfigManager::load_from_directory_with_env(
            Some(dir.path().join("does-not-exist")),
            "test",
        )
        .expect("defaults should load");

        assert_eq!(manager.environment(), "test");
        assert_eq!(manager.config().environment, "test");
        assert_eq!(manager.config().checklist.hash_length, 8);
    }

    #[test]
    fn test_environment_file_overrides_base_file() {
        let dir = TempDir::new().expect("temp dir");
        fs::write(
            dir.path().join("checklist.toml"),
            r#"
[web]
bind_address = "127.0.0.1:4000"

[checklist]
hash_length = 10
"#,
        )
        .expect("write base config");
        fs::write(
            dir.path().join("checklist.test.toml"),
            r#"
[store]
backend = "memory"

[checklist]
hash_length = 12
"#,
        )
        .expect("write env config");

        let manager =
            ConfigManager::load_from_directory_with_env(Some(dir.path().to_path_buf()), "test")
                .expect("config should load");
        let config = manager.config();

        assert_eq!(config.web.bind_address, "127.0.0.1:4000");
        assert_eq!(config.checklist.hash_length, 12);
        assert_eq!(config.store.backend, StoreBackend::Memory);
        assert_eq!(config.checklist.default_title, "Untitled Checklist");
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let dir = TempDir::new().expect("temp dir");
        fs::write(
            dir.path().join("checklist.toml"),
            "[checklist]\nhash_length = 0\n",
        )
        .expect("write config");

        let result =
            ConfigManager::load_from_directory_with_env(Some(dir.path().to_path_buf()), "test");
        assert!(matches!(result, Err(ChecklistError::Configuration(_))));
    }
}
