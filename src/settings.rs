//! User settings loaded from the platform config directory.

use crate::constants::DEFAULT_MAP_NAME;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const MAPS_DIR_ENV: &str = "W3ATLAS_MAPS_DIR";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings from {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid settings file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub maps_dir: PathBuf,
    pub default_map: String,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            maps_dir: default_maps_dir(),
            default_map: DEFAULT_MAP_NAME.to_string(),
            log_filter: "info".to_string(),
        }
    }
}

/// `~/.w3atlas/maps`, or `./maps` when no home directory is known.
fn default_maps_dir() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(".w3atlas").join("maps"))
        .unwrap_or_else(|| PathBuf::from("maps"))
}

/// Location of `settings.json`, if the platform has a config directory.
pub fn settings_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "w3atlas").map(|dirs| dirs.config_dir().join("settings.json"))
}

impl Settings {
    /// Reads settings from `path`; a missing file gives the defaults.
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let json = match fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(SettingsError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        serde_json::from_str(&json).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Settings file plus environment overrides.
    pub fn load() -> Result<Self, SettingsError> {
        let settings = match settings_path() {
            Some(path) => Self::load_from(&path)?,
            None => Self::default(),
        };
        Ok(settings.with_env_overrides(env::var(MAPS_DIR_ENV).ok()))
    }

    fn with_env_overrides(mut self, maps_dir: Option<String>) -> Self {
        if let Some(dir) = maps_dir.filter(|d| !d.trim().is_empty()) {
            self.maps_dir = PathBuf::from(dir);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_file(name: &str) -> PathBuf {
        let dir = env::temp_dir().join(format!("w3atlas-settings-{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        dir.join(name)
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let path = scratch_file("settings.json");
        let settings = Settings::load_from(&path).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.default_map, "Concealed Hill");
    }

    #[test]
    fn test_partial_file_fills_in_defaults() {
        let path = scratch_file("settings.json");
        fs::write(&path, r#"{"default_map": "Echo Isles"}"#).unwrap();
        let settings = Settings::load_from(&path).unwrap();
        assert_eq!(settings.default_map, "Echo Isles");
        assert_eq!(settings.log_filter, "info");
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let path = scratch_file("settings.json");
        fs::write(&path, "[]").unwrap();
        assert!(matches!(
            Settings::load_from(&path),
            Err(SettingsError::Parse { .. })
        ));
    }

    #[test]
    fn test_env_override_replaces_maps_dir() {
        let settings = Settings::default().with_env_overrides(Some("/srv/maps".to_string()));
        assert_eq!(settings.maps_dir, PathBuf::from("/srv/maps"));

        let settings = Settings::default().with_env_overrides(Some("  ".to_string()));
        assert_eq!(settings.maps_dir, Settings::default().maps_dir);
    }
}
