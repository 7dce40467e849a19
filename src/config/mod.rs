//! Persisted shell preferences.

use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::record::ContractLine;
use crate::utils::{app_data_dir, ensure_dir, write_atomic};

const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub notification_ttl_secs: u32,
    pub default_line: ContractLine,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_export_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operator_id: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            notification_ttl_secs: 5,
            default_line: ContractLine::Academic,
            last_export_path: None,
            operator_id: None,
        }
    }
}

impl Config {
    pub fn notification_ttl(&self) -> Duration {
        Duration::seconds(i64::from(self.notification_ttl_secs))
    }
}

pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self> {
        Self::with_base_dir(app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self> {
        ensure_dir(&base)?;
        Ok(Self {
            path: base.join(CONFIG_FILE),
        })
    }

    /// Reads the saved config, or the defaults when nothing has been saved yet.
    pub fn load(&self) -> Result<Config> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            Ok(serde_json::from_str(&data)?)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<()> {
        let json = serde_json::to_string_pretty(config)?;
        write_atomic(&self.path, &json)?;
        tracing::info!(path = %self.path.display(), "config saved");
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        let config = manager.load().unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.notification_ttl(), Duration::seconds(5));
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().join("home")).unwrap();
        let config = Config {
            notification_ttl_secs: 8,
            default_line: ContractLine::LibraryServices,
            last_export_path: Some("out.json".into()),
            operator_id: Some("A001".into()),
        };
        manager.save(&config).unwrap();
        assert_eq!(manager.load().unwrap(), config);
    }

    #[test]
    fn partial_files_fill_in_defaults() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        fs::write(manager.path(), r#"{ "default_line": "library-services" }"#).unwrap();
        let config = manager.load().unwrap();
        assert_eq!(config.default_line, ContractLine::LibraryServices);
        assert_eq!(config.notification_ttl_secs, 5);
    }
}
