//! Application state and command handling for the command-line front end

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use anyhow::{Context, Result};

use crate::core::config::AppConfig;
use crate::core::document::ConfDocument;
use crate::core::library::{self, GameEntry, GameLibrary};
use crate::core::parser::{self, ParseOptions};
use crate::core::settings::{self, SettingValue};
use crate::core::writer::{self, RawSections, WriteOptions, AUTOEXEC};

/// Main application state
pub struct DosconfApp {
    /// Application configuration
    pub config: AppConfig,
    /// Registered games
    pub library: GameLibrary,
    /// How leniently config files are read
    pub parse_options: ParseOptions,
}

impl DosconfApp {
    /// Create the application from a loaded configuration
    pub fn new(config: AppConfig) -> Result<Self> {
        let library = GameLibrary::load(&config.library_path())?;
        Ok(Self {
            config,
            library,
            parse_options: ParseOptions::default(),
        })
    }

    fn write_options(&self) -> WriteOptions {
        let raw_sections = if self.config.keep_all_raw_sections {
            RawSections::All
        } else {
            RawSections::default()
        };
        WriteOptions { raw_sections }
    }

    /// Resolve a game name or a config file path to a config file
    ///
    /// Library games without a config file get one from the base template.
    pub fn resolve(&self, target: &str) -> Result<PathBuf> {
        let path = Path::new(target);
        if path.exists() || path.extension().is_some_and(|ext| ext == "conf") {
            return Ok(path.to_path_buf());
        }

        let entry = self
            .library
            .find(target)
            .ok_or_else(|| anyhow::anyhow!("No game or config file named {:?}", target))?;
        library::ensure_config(entry, &self.config.base_config())
    }

    /// Open and parse a config file
    pub fn open_document(&self, target: &str) -> Result<(PathBuf, ConfDocument)> {
        let path = self.resolve(target)?;
        tracing::info!("Loading game config: {}", path.display());
        let doc = parser::parse_file_with(&path, self.parse_options)
            .with_context(|| format!("Failed to open config: {}", path.display()))?;
        if doc.is_empty() {
            tracing::warn!("{} has no sections", path.display());
        }
        Ok((path, doc))
    }

    /// Write a document back to its file
    pub fn save_document(&self, path: &Path, doc: &ConfDocument) -> Result<()> {
        writer::write_with(doc, path, &self.write_options())
            .with_context(|| format!("Failed to save config: {}", path.display()))
    }

    /// List registered games
    pub fn list_games(&self) -> Vec<String> {
        self.library
            .games()
            .iter()
            .map(|g| format!("{}\t{}", g.name, g.config_path().display()))
            .collect()
    }

    /// Register a game and create its config from the template
    pub fn add_game(&mut self, name: &str, config_dir: PathBuf) -> Result<PathBuf> {
        let entry = GameEntry::new(name, config_dir);
        let path = library::ensure_config(&entry, &self.config.base_config())?;
        self.library.add(entry);
        self.library.save()?;
        Ok(path)
    }

    /// Render the document as it would be saved
    pub fn show(&self, target: &str) -> Result<String> {
        let (_, doc) = self.open_document(target)?;
        Ok(writer::render(&doc, &self.write_options()))
    }

    /// Typed view of every known setting, as text or JSON
    pub fn show_settings(&self, target: &str, json: bool) -> Result<String> {
        let (_, doc) = self.open_document(target)?;
        let rows = settings::snapshot(&doc)?;
        if json {
            return Ok(serde_json::to_string_pretty(&rows)?);
        }

        let mut out = String::new();
        for row in rows.iter().filter(|r| r.known.key != AUTOEXEC) {
            let value = row
                .value
                .as_ref()
                .map(SettingValue::to_string)
                .unwrap_or_else(|| "-".to_string());
            out.push_str(&format!("[{}] {} = {}\n", row.known.section, row.known.key, value));
        }
        Ok(out)
    }

    /// Read one value
    pub fn get(&self, target: &str, section: &str, key: &str) -> Result<String> {
        let (_, doc) = self.open_document(target)?;
        let value = match settings::lookup(section, key) {
            Some(known) => settings::read(&doc, known)?.map(|v| v.to_string()),
            None => doc.get(section, key).map(str::to_string),
        };
        value.ok_or_else(|| anyhow::anyhow!("[{}] {} is not set", section, key))
    }

    /// Change one value and save
    pub fn set(&self, target: &str, section: &str, key: &str, value: &str) -> Result<()> {
        let (path, mut doc) = self.open_document(target)?;
        settings::apply(&mut doc, [(section, key, value)])?;
        self.save_document(&path, &doc)
    }

    /// Remove one value and save; returns whether it was set
    pub fn unset(&self, target: &str, section: &str, key: &str) -> Result<bool> {
        let (path, mut doc) = self.open_document(target)?;
        let Some(previous) = doc.remove_key(section, key) else {
            return Ok(false);
        };
        tracing::debug!("Removed [{}] {} = {}", section, key, previous);
        doc.remove_empty_sections();
        self.save_document(&path, &doc)?;
        Ok(true)
    }

    /// Read the boot script
    pub fn autoexec(&self, target: &str) -> Result<String> {
        let (_, doc) = self.open_document(target)?;
        Ok(doc.get_raw(AUTOEXEC))
    }

    /// Replace the boot script with the contents of `source` (`-` for stdin)
    pub fn set_autoexec(&self, target: &str, source: &Path) -> Result<()> {
        let script = if source == Path::new("-") {
            let mut script = String::new();
            std::io::stdin()
                .read_to_string(&mut script)
                .context("Failed to read script from stdin")?;
            script
        } else {
            std::fs::read_to_string(source)
                .with_context(|| format!("Failed to read script: {}", source.display()))?
        };

        let (path, mut doc) = self.open_document(target)?;
        doc.set_raw(AUTOEXEC, script);
        self.save_document(&path, &doc)
    }

    fn find_game(&self, name: &str) -> Result<GameEntry> {
        self.library
            .find(name)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("No game named {:?}", name))
    }

    /// Overwrite a game's config with the base template
    pub fn reset(&self, name: &str) -> Result<PathBuf> {
        let entry = self.find_game(name)?;
        library::reset_config(&entry, &self.config.base_config())
    }

    /// Delete a game's config and drop it from the library
    pub fn remove(&mut self, name: &str) -> Result<()> {
        let entry = self.find_game(name)?;
        self.library.remove_config(&entry)
    }

    /// Start DOSBox with the game's config without waiting for it
    pub fn launch(&self, name: &str) -> Result<()> {
        let entry = self.find_game(name)?;
        let path = entry.config_path();
        if !path.exists() {
            anyhow::bail!("{} does not have a config file: {}", entry.name, path.display());
        }

        tracing::info!("Launching {} with {}", entry.name, path.display());
        Command::new(&self.config.dosbox_command)
            .arg("-conf")
            .arg(&path)
            .stdin(Stdio::null())
            .spawn()
            .with_context(|| format!("Failed to start {}", self.config.dosbox_command))?;
        Ok(())
    }
}
