use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::error::ConfigError;
use crate::logging::DEFAULT_MAX_LOG_LINES;

/// Name of the organizer's private metadata folder inside every location.
pub const DEFAULT_META_FOLDER: &str = ".ts";

/// Read-only settings snapshot consulted while loading directory trees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub show_unix_hidden_entries: bool,
    pub meta_folder: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            show_unix_hidden_entries: false,
            meta_folder: DEFAULT_META_FOLDER.to_string(),
        }
    }
}

impl Settings {
    /// Whether an entry with this name is hidden from location trees.
    pub fn hides(&self, entry_name: &str) -> bool {
        !self.show_unix_hidden_entries && entry_name == self.meta_folder
    }
}

pub trait SettingsSource: Send + Sync {
    fn current_settings(&self) -> Settings;
}

impl SettingsSource for Settings {
    fn current_settings(&self) -> Settings {
        self.clone()
    }
}

/// Settings that the UI may change while the app runs.
impl SettingsSource for RwLock<Settings> {
    fn current_settings(&self) -> Settings {
        match self.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub settings: Settings,
    pub store_path: Option<PathBuf>,
    pub max_log_lines: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            settings: Settings::default(),
            store_path: None,
            max_log_lines: DEFAULT_MAX_LOG_LINES,
        }
    }
}

impl AppConfig {
    /// Load a YAML config. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        Self::from_yaml(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_settings_hides_meta_folder_only() {
        let settings = Settings::default();
        assert!(settings.hides(".ts"));
        assert!(!settings.hides("Photos"));
        assert!(!settings.hides(".git"));

        let show_all = Settings {
            show_unix_hidden_entries: true,
            ..Settings::default()
        };
        assert!(!show_all.hides(".ts"));
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = AppConfig::from_yaml("settings:\n  show_unix_hidden_entries: true\n").unwrap();
        assert!(config.settings.show_unix_hidden_entries);
        assert_eq!(config.settings.meta_folder, DEFAULT_META_FOLDER);
        assert_eq!(config.max_log_lines, DEFAULT_MAX_LOG_LINES);
        assert!(config.store_path.is_none());
    }

    #[test]
    fn test_empty_yaml_is_default() {
        let config = AppConfig::from_yaml("  \n").unwrap();
        assert_eq!(config.settings, Settings::default());
    }

    #[test]
    fn test_load_missing_file_is_default() {
        let dir = TempDir::new().unwrap();
        let config = AppConfig::load(&dir.path().join("absent.yaml")).unwrap();
        assert_eq!(config.settings, Settings::default());
    }

    #[test]
    fn test_load_invalid_yaml_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "settings: [not, a, map]").unwrap();

        let err = AppConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_rwlock_settings_source_sees_updates() {
        let shared = RwLock::new(Settings::default());
        assert!(!shared.current_settings().show_unix_hidden_entries);

        shared.write().unwrap().show_unix_hidden_entries = true;
        assert!(shared.current_settings().show_unix_hidden_entries);
    }
}
