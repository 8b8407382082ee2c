//! Application configuration management

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Game library file; defaults to `games.json` in the data directory
    pub library_path: Option<PathBuf>,
    /// Config file copied into place for games that have none yet
    pub base_config: Option<PathBuf>,
    /// DOSBox executable
    pub dosbox_command: String,
    /// Write raw lines of every section, not only `[autoexec]`
    pub keep_all_raw_sections: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            library_path: None,
            base_config: None,
            dosbox_command: "dosbox".to_string(),
            keep_all_raw_sections: false,
        }
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "dosconf", "Dosconf")
}

impl AppConfig {
    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load configuration from disk
    pub fn load() -> Result<Self> {
        let path = Self::config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        Self::load_from(&path)
    }

    /// Load configuration from a specific file; a missing file yields defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Invalid config: {}", path.display()))?;
        tracing::debug!("Loaded config from: {}", path.display());
        Ok(config)
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        self.save_to(&path)
    }

    /// Save configuration to a specific file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure config directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to save config: {}", path.display()))?;

        tracing::info!("Saved config to: {}", path.display());
        Ok(())
    }

    /// Get the game library path
    pub fn library_path(&self) -> PathBuf {
        self.library_path.clone().unwrap_or_else(|| {
            project_dirs()
                .map(|dirs| dirs.data_dir().join("games.json"))
                .unwrap_or_else(|| PathBuf::from("games.json"))
        })
    }

    /// Get the base config template path
    pub fn base_config(&self) -> PathBuf {
        self.base_config.clone().unwrap_or_else(|| {
            project_dirs()
                .map(|dirs| dirs.data_dir().join("base-config.conf"))
                .unwrap_or_else(|| PathBuf::from("base-config.conf"))
        })
    }
}
