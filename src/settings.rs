use log::debug;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::config::ProviderConfig;
use crate::error::AnalysisError;

/// Persistence for the user's provider selection
pub trait SettingsStore {
    fn load(&self) -> Result<ProviderConfig, AnalysisError>;
    fn save(&self, config: &ProviderConfig) -> Result<(), AnalysisError>;
}

/// Provider settings stored as a JSON file
#[derive(Debug, Clone)]
pub struct FileSettingsStore {
    path: PathBuf,
}

impl FileSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStore for FileSettingsStore {
    /// A missing file yields the default (hosted) configuration
    fn load(&self) -> Result<ProviderConfig, AnalysisError> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No settings at {}, using defaults", self.path.display());
                return Ok(ProviderConfig::default());
            }
            Err(e) => return Err(e.into()),
        };

        serde_json::from_str(&contents).map_err(|e| {
            AnalysisError::Configuration(format!(
                "invalid settings file {}: {}",
                self.path.display(),
                e
            ))
        })
    }

    fn save(&self, config: &ProviderConfig) -> Result<(), AnalysisError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(config).map_err(|e| {
            AnalysisError::Configuration(format!("failed to serialize settings: {}", e))
        })?;
        std::fs::write(&self.path, json)?;
        debug!("Saved settings to {}", self.path.display());
        Ok(())
    }
}

/// Settings kept in memory, for embedding and tests
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    config: Mutex<ProviderConfig>,
}

impl MemorySettingsStore {
    pub fn new(config: ProviderConfig) -> Self {
        Self {
            config: Mutex::new(config),
        }
    }
}

impl SettingsStore for MemorySettingsStore {
    fn load(&self) -> Result<ProviderConfig, AnalysisError> {
        self.config
            .lock()
            .map(|config| config.clone())
            .map_err(|_| AnalysisError::Configuration("settings lock poisoned".to_string()))
    }

    fn save(&self, config: &ProviderConfig) -> Result<(), AnalysisError> {
        let mut guard = self
            .config
            .lock()
            .map_err(|_| AnalysisError::Configuration("settings lock poisoned".to_string()))?;
        *guard = config.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CustomProvider, ProviderKind};

    #[test]
    fn test_missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSettingsStore::new(dir.path().join("settings.json"));
        assert_eq!(store.load().unwrap(), ProviderConfig::hosted());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSettingsStore::new(dir.path().join("nested/dir/settings.json"));
        let config = ProviderConfig::custom(CustomProvider::new(
            "http://localhost:1234/v1",
            "lm-studio",
            "qwen2-vl",
        ));

        store.save(&config).unwrap();
        let loaded = store.load().unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.kind, ProviderKind::Custom);
    }

    #[test]
    fn test_corrupt_file_is_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{not json").unwrap();

        let store = FileSettingsStore::new(path);
        assert!(matches!(
            store.load(),
            Err(AnalysisError::Configuration(_))
        ));
    }

    #[test]
    fn test_memory_store() {
        let store = MemorySettingsStore::default();
        assert_eq!(store.load().unwrap().kind, ProviderKind::Hosted);

        let config = ProviderConfig::custom(CustomProvider::new("http://x/v1", "k", "m"));
        store.save(&config).unwrap();
        assert_eq!(store.load().unwrap(), config);
    }
}
