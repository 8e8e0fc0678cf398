use crate::settings::config::Settings;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Loads the bridge settings from a TOML file. A missing file means
/// defaults; nothing is written to disk unless `save` is called.
#[derive(Debug, Clone)]
pub struct SettingsManager {
    settings_path: PathBuf,
    settings: Settings,
}

impl SettingsManager {
    /// Load from a specific path
    pub fn from_path(path: PathBuf) -> Result<Self> {
        let settings = Self::load_from_file_with_backup(&path)?;
        Ok(Self {
            settings_path: path,
            settings,
        })
    }

    /// ~/.gtts-bridge/settings.toml
    pub fn default_settings_path() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Failed to get home directory")?;
        Ok(home.join(".gtts-bridge").join("settings.toml"))
    }

    /// Load settings from a TOML file, moving an unparsable file aside
    fn load_from_file_with_backup(path: &Path) -> Result<Settings> {
        if !path.exists() {
            return Ok(Settings::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {path:?}"))?;

        match toml::from_str(&contents) {
            Ok(settings) => Ok(settings),
            Err(e) => {
                let backup_path = path.with_extension("toml.backup");
                tracing::warn!(
                    ?path,
                    ?backup_path,
                    error = %e,
                    "Settings file is not valid TOML, using defaults"
                );
                fs::rename(path, &backup_path).with_context(|| {
                    format!("Failed to backup corrupted settings to {backup_path:?}")
                })?;
                Ok(Settings::default())
            }
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Update in-memory settings. Not saved to disk.
    pub fn update_setting<F>(&mut self, updater: F)
    where
        F: FnOnce(&mut Settings),
    {
        updater(&mut self.settings);
    }

    /// Write the in-memory settings to disk
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.settings_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {parent:?}"))?;
        }

        let contents =
            toml::to_string_pretty(&self.settings).context("Failed to serialize settings")?;

        fs::write(&self.settings_path, contents)
            .with_context(|| format!("Failed to write settings to {:?}", self.settings_path))
    }

    pub fn into_settings(self) -> Settings {
        self.settings
    }
}
