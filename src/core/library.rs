//! Game library: the list of games and where their config files live

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// A game registered in the library
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEntry {
    /// Display name
    pub name: String,
    /// Directory holding the game's config file
    #[serde(rename = "config_file")]
    pub config_dir: PathBuf,
}

impl GameEntry {
    pub fn new(name: impl Into<String>, config_dir: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            config_dir: config_dir.into(),
        }
    }

    /// `<config_dir>/<name lower-cased, without spaces>.conf`
    pub fn config_path(&self) -> PathBuf {
        let stem: String = self
            .name
            .chars()
            .filter(|c| *c != ' ')
            .collect::<String>()
            .to_lowercase();
        self.config_dir.join(format!("{}.conf", stem))
    }
}

/// Copy the base template into place if the game has no config yet
pub fn ensure_config(entry: &GameEntry, template: &Path) -> Result<PathBuf> {
    let path = entry.config_path();
    if !path.exists() {
        reset_config(entry, template)?;
    }
    Ok(path)
}

/// Overwrite the game's config with the base template
pub fn reset_config(entry: &GameEntry, template: &Path) -> Result<PathBuf> {
    let path = entry.config_path();
    fs::copy(template, &path).with_context(|| {
        format!(
            "Failed to copy template {} to {}",
            template.display(),
            path.display()
        )
    })?;
    tracing::info!("Created config for {} from template: {}", entry.name, path.display());
    Ok(path)
}

/// The persisted list of games
#[derive(Debug, Clone, Default)]
pub struct GameLibrary {
    path: PathBuf,
    games: Vec<GameEntry>,
}

impl GameLibrary {
    /// Load the library; a missing file is an empty library
    pub fn load(path: &Path) -> Result<Self> {
        let games = if path.exists() {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read game library: {}", path.display()))?;
            serde_json::from_str(&content)
                .with_context(|| format!("Invalid game library: {}", path.display()))?
        } else {
            Vec::new()
        };

        Ok(Self {
            path: path.to_path_buf(),
            games,
        })
    }

    /// Save the library to the file it was loaded from
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&self.games)?;
        fs::write(&self.path, content)
            .with_context(|| format!("Failed to save game library: {}", self.path.display()))?;
        tracing::info!("Saved game library: {}", self.path.display());
        Ok(())
    }

    pub fn games(&self) -> &[GameEntry] {
        &self.games
    }

    /// Find a game by name, ignoring case
    pub fn find(&self, name: &str) -> Option<&GameEntry> {
        self.games.iter().find(|g| g.name.eq_ignore_ascii_case(name))
    }

    /// Add a game, replacing an existing entry with the same name
    pub fn add(&mut self, entry: GameEntry) {
        self.games.retain(|g| !g.name.eq_ignore_ascii_case(&entry.name));
        self.games.push(entry);
    }

    /// Drop every game whose config lives in `config_dir`; returns how many were removed
    pub fn remove_by_config_dir(&mut self, config_dir: &Path) -> usize {
        let before = self.games.len();
        self.games.retain(|g| g.config_dir != config_dir);
        before - self.games.len()
    }

    /// Delete a game's config file and remove it from the library
    pub fn remove_config(&mut self, entry: &GameEntry) -> Result<()> {
        let path = entry.config_path();
        match fs::remove_file(&path) {
            Ok(()) => tracing::info!("Removed game config: {}", path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!("Config file not found: {}", path.display());
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to remove {}", path.display()));
            }
        }

        let removed = self.remove_by_config_dir(&entry.config_dir);
        tracing::debug!("Dropped {} library entries for {}", removed, entry.name);
        self.save()
    }
}
