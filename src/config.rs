//! Application configuration
//!
//! Defaults cover a working setup out of the box; an optional `config.json`
//! in the data directory overrides them.

use crate::db::sqlite::models::Field;
use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default location: Kolkata
pub const DEFAULT_LATITUDE: f64 = 22.5726;
pub const DEFAULT_LONGITUDE: f64 = 88.3639;

const CONFIG_FILE: &str = "config.json";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub latitude: f64,
    pub longitude: f64,
    pub database_file: String,
    pub model_file: String,
    /// Variables requested from the air-quality API
    pub hourly_fields: Vec<Field>,
    /// Network request timeout (seconds)
    pub request_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            latitude: DEFAULT_LATITUDE,
            longitude: DEFAULT_LONGITUDE,
            database_file: "ghg_monitor.db".to_string(),
            model_file: "lstm_co.model".to_string(),
            hourly_fields: Field::ALL.to_vec(),
            request_timeout_secs: 20,
        }
    }
}

impl AppConfig {
    /// Load configuration from the data directory, falling back to defaults
    /// when no config file exists
    pub fn load(data_dir: &Path) -> Result<Self> {
        let path = data_dir.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&path)?;
        serde_json::from_str(&contents)
            .map_err(|e| AppError::Config(format!("invalid {}: {}", path.display(), e)))
    }

    pub fn database_path(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(&self.database_file)
    }

    pub fn model_path(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(&self.model_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_when_no_config_file() {
        let dir = tempdir().unwrap();
        let config = AppConfig::load(dir.path()).unwrap();
        assert_eq!(config.latitude, DEFAULT_LATITUDE);
        assert_eq!(config.hourly_fields.len(), 9);
        assert_eq!(config.request_timeout_secs, 20);
    }

    #[test]
    fn test_partial_config_file_overrides_defaults() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            r#"{ "latitude": 51.5, "longitude": -0.12, "hourly_fields": ["co", "o3"] }"#,
        )
        .unwrap();

        let config = AppConfig::load(dir.path()).unwrap();
        assert_eq!(config.latitude, 51.5);
        assert_eq!(config.hourly_fields, vec![Field::Co, Field::O3]);
        // Untouched keys keep their defaults
        assert_eq!(config.database_file, "ghg_monitor.db");
    }

    #[test]
    fn test_invalid_config_file_is_config_error() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "{ not json").unwrap();
        let err = AppConfig::load(dir.path()).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }
}
