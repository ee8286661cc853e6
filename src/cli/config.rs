//! Configuration file support.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::autosave::{AutoSaveConfig, DEFAULT_AUTOSAVE_DELAY};

/// Application configuration loaded from config file.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Default notes directory
    pub dir: Option<PathBuf>,

    pub autosave: AutoSaveSettings,
}

/// The `[autosave]` table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AutoSaveSettings {
    /// Debounce window in milliseconds
    pub delay_ms: u64,
}

impl Default for AutoSaveSettings {
    fn default() -> Self {
        Self {
            delay_ms: DEFAULT_AUTOSAVE_DELAY.as_millis() as u64,
        }
    }
}

impl From<&AutoSaveSettings> for AutoSaveConfig {
    fn from(settings: &AutoSaveSettings) -> Self {
        Self {
            delay: Duration::from_millis(settings.delay_ms),
        }
    }
}

impl Config {
    /// Load configuration from the default config file location.
    ///
    /// Returns default config if the file doesn't exist.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            log::debug!("no config file at {}", config_path.display());
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(config_path)
            .with_context(|| format!("failed to read config file: {}", config_path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", config_path.display()))
    }

    /// Returns the path to the config file.
    ///
    /// Default: `~/.config/notemaker/config.toml`
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("notemaker")
            .join("config.toml")
    }

    /// Resolve the notes directory, with CLI argument taking precedence.
    ///
    /// Precedence order:
    /// 1. CLI `--dir` argument
    /// 2. Config file `dir` setting
    /// 3. Current working directory
    pub fn notes_dir(&self, cli_dir: Option<&PathBuf>) -> PathBuf {
        cli_dir
            .cloned()
            .or_else(|| self.dir.clone())
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Autosave settings, with an optional delay override in milliseconds.
    pub fn autosave(&self, delay_ms: Option<u64>) -> AutoSaveConfig {
        match delay_ms {
            Some(delay_ms) => AutoSaveConfig::from(&AutoSaveSettings { delay_ms }),
            None => AutoSaveConfig::from(&self.autosave),
        }
    }
}
