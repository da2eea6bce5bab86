//! Configuration management for Blogwiz
//!
//! The TOML file only says where things live. Editor preferences and
//! platform credentials are `AppSettings`, stored inside the archive blob so
//! that export/import carries them.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, Result};
use crate::platforms::Platform;
use crate::storage::ARCHIVE_KEY;

/// Environment variable overriding the config file location
pub const CONFIG_ENV: &str = "BLOGWIZ_CONFIG";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StorageConfig {
    /// Directory holding the key/value store
    #[serde(default = "default_storage_path")]
    pub path: String,
    /// Key the archive blob is stored under
    #[serde(default = "default_storage_key")]
    pub key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DefaultsConfig {
    /// Platform used by `wiz-format` when none is given
    #[serde(default = "default_platform")]
    pub platform: Platform,
    /// Directory suggested by the export dialog
    #[serde(default)]
    pub export_dir: Option<String>,
}

fn default_storage_path() -> String {
    "~/.local/share/blogwiz".to_string()
}

fn default_storage_key() -> String {
    ARCHIVE_KEY.to_string()
}

fn default_platform() -> Platform {
    Platform::Custom
}

impl Default for StorageConfig {
    fn default() -> Self {
        let path = dirs::data_dir()
            .map(|dir| dir.join("blogwiz").to_string_lossy().into_owned())
            .unwrap_or_else(default_storage_path);
        Self {
            path,
            key: default_storage_key(),
        }
    }
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            platform: default_platform(),
            export_dir: None,
        }
    }
}

impl Config {
    /// Load configuration from the default location
    ///
    /// A missing file yields the default configuration; a file that exists
    /// but does not parse is an error.
    pub fn load() -> Result<Self> {
        let config_path = resolve_config_path()?;
        if !config_path.exists() {
            tracing::debug!(path = %config_path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadError)?;
        let config: Config = toml::from_str(&content).map_err(ConfigError::ParseError)?;
        Ok(config)
    }

    /// Write configuration to the default location
    pub fn save(&self) -> Result<PathBuf> {
        let path = resolve_config_path()?;
        self.save_to_path(&path)?;
        Ok(path)
    }

    /// Write configuration to a specific path, creating parent directories
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigError::ReadError)?;
        }
        let content = toml::to_string_pretty(self).map_err(ConfigError::SerializeError)?;
        std::fs::write(path, content).map_err(ConfigError::ReadError)?;
        Ok(())
    }

    /// Storage directory with `~` expanded
    pub fn storage_dir(&self) -> PathBuf {
        expand_path(&self.storage.path)
    }

    /// Export directory with `~` expanded, falling back to the working directory
    pub fn export_dir(&self) -> PathBuf {
        self.defaults
            .export_dir
            .as_deref()
            .map(expand_path)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

fn expand_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).to_string())
}

/// Resolve the configuration file path following XDG Base Directory spec
pub fn resolve_config_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_ENV) {
        return Ok(expand_path(&path));
    }

    let config_dir = dirs::config_dir()
        .ok_or_else(|| ConfigError::MissingField("config directory".to_string()))?;

    Ok(config_dir.join("blogwiz").join("config.toml"))
}
