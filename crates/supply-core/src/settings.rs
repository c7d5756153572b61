//! Application settings management
//!
//! Stores non-sensitive configuration in a plain JSON file.
//! The profile itself never lives here; it goes to the secure store.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

use crate::error::{Result, SupplyError};
use crate::storage::DEFAULT_SERVICE_NAME;

/// Default key of the single profile record
pub const DEFAULT_PROFILE_KEY: &str = "userData";

/// Which secure store holds the profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    /// OS credential store
    #[default]
    Keychain,
    /// Process-local map (nothing persists)
    Memory,
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Keychain => f.write_str("keychain"),
            Self::Memory => f.write_str("memory"),
        }
    }
}

impl FromStr for StoreBackend {
    type Err = SupplyError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "keychain" => Ok(Self::Keychain),
            "memory" => Ok(Self::Memory),
            other => Err(SupplyError::ConfigError(format!(
                "unknown backend '{}', expected keychain or memory",
                other
            ))),
        }
    }
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Settings file version
    pub version: u32,
    /// Keychain service name (defaults to "supply")
    pub service_name: Option<String>,
    /// Key of the profile record (defaults to "userData")
    pub profile_key: Option<String>,
    /// Backend holding the profile
    pub backend: StoreBackend,
}

impl Settings {
    /// Create default settings
    pub fn new() -> Self {
        Self {
            version: 1,
            service_name: Some(DEFAULT_SERVICE_NAME.to_string()),
            profile_key: Some(DEFAULT_PROFILE_KEY.to_string()),
            backend: StoreBackend::Keychain,
        }
    }

    /// Get the effective keychain service name
    pub fn effective_service_name(&self) -> &str {
        self.service_name.as_deref().unwrap_or(DEFAULT_SERVICE_NAME)
    }

    /// Get the effective profile record key
    pub fn effective_profile_key(&self) -> &str {
        self.profile_key.as_deref().unwrap_or(DEFAULT_PROFILE_KEY)
    }
}

/// Settings manager
pub struct SettingsManager {
    settings_file: PathBuf,
    settings: Settings,
}

impl SettingsManager {
    /// Create a settings manager reading `settings.json` from the given directory
    pub fn new(config_dir: &Path) -> Result<Self> {
        let settings_file = config_dir.join("settings.json");
        let settings = Self::load_from_file(&settings_file)?;

        Ok(Self {
            settings_file,
            settings,
        })
    }

    /// Get the default configuration directory
    pub fn default_dir() -> Result<PathBuf> {
        ProjectDirs::from("com", "supply", "supply")
            .map(|dirs| dirs.config_dir().to_path_buf())
            .ok_or_else(|| {
                SupplyError::ConfigError("Could not determine config directory".to_string())
            })
    }

    /// Load settings from file
    fn load_from_file(path: &Path) -> Result<Settings> {
        if !path.exists() {
            debug!("No settings file found, using defaults");
            return Ok(Settings::new());
        }

        let contents = std::fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&contents)
            .map_err(|e| SupplyError::ConfigError(format!("{}: {}", path.display(), e)))?;
        debug!("Loaded settings from {:?}", path);
        Ok(settings)
    }

    /// Save settings to file
    pub fn save(&self) -> Result<()> {
        let contents = serde_json::to_string_pretty(&self.settings)?;

        if let Some(parent) = self.settings_file.parent() {
            std::fs::create_dir_all(parent)?;
        }

        // Write atomically using temp file
        let temp_path = self.settings_file.with_extension("tmp");
        std::fs::write(&temp_path, &contents)?;
        std::fs::rename(&temp_path, &self.settings_file)?;

        debug!("Saved settings to {:?}", self.settings_file);
        Ok(())
    }

    /// Get current settings
    pub fn get(&self) -> &Settings {
        &self.settings
    }

    /// Update settings and save
    pub fn update(&mut self, settings: Settings) -> Result<()> {
        self.settings = settings;
        self.save()
    }

    /// Path of the backing file
    pub fn settings_file(&self) -> &Path {
        &self.settings_file
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_settings_default() {
        let temp_dir = TempDir::new().unwrap();
        let manager = SettingsManager::new(temp_dir.path()).unwrap();

        let settings = manager.get();
        assert_eq!(settings.effective_service_name(), "supply");
        assert_eq!(settings.effective_profile_key(), "userData");
        assert_eq!(settings.backend, StoreBackend::Keychain);
    }

    #[test]
    fn test_settings_persistence() {
        let temp_dir = TempDir::new().unwrap();

        {
            let mut manager = SettingsManager::new(temp_dir.path()).unwrap();
            let mut settings = manager.get().clone();
            settings.service_name = Some("supply-staging".to_string());
            settings.backend = StoreBackend::Memory;
            manager.update(settings).unwrap();
            assert!(manager.settings_file().exists());
            assert!(!manager.settings_file().with_extension("tmp").exists());
        }

        {
            let manager = SettingsManager::new(temp_dir.path()).unwrap();
            assert_eq!(manager.get().effective_service_name(), "supply-staging");
            assert_eq!(manager.get().effective_profile_key(), "userData");
            assert_eq!(manager.get().backend, StoreBackend::Memory);
        }
    }

    #[test]
    fn test_partial_settings_file() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(
            temp_dir.path().join("settings.json"),
            r#"{"version":1,"profileKey":"profile-v2"}"#,
        )
        .unwrap();

        let manager = SettingsManager::new(temp_dir.path()).unwrap();
        assert_eq!(manager.get().effective_profile_key(), "profile-v2");
        assert_eq!(manager.get().effective_service_name(), "supply");
        assert_eq!(manager.get().backend, StoreBackend::Keychain);
    }

    #[test]
    fn test_malformed_settings_file() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("settings.json"), "{ nope").unwrap();

        let result = SettingsManager::new(temp_dir.path());
        assert!(matches!(result, Err(SupplyError::ConfigError(_))));
    }

    #[test]
    fn test_backend_parsing() {
        assert_eq!("Memory".parse::<StoreBackend>().unwrap(), StoreBackend::Memory);
        assert_eq!(StoreBackend::Keychain.to_string(), "keychain");
        assert!("file".parse::<StoreBackend>().is_err());
    }
}
