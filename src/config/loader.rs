use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::ResolveError;
use crate::target::Target;

/// Errors that can occur when loading the config file.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    #[error("Failed to read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config validation failed: {source}")]
    Validation {
        #[source]
        source: ResolveError,
    },
}

/// On-disk defaults for the CLI. Environment variables always win.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileConfig {
    /// Default target when no `--target` flag is given.
    #[serde(default)]
    pub target: Option<String>,
}

impl FileConfig {
    /// Returns the path to the configuration file.
    ///
    /// Uses `~/.config/testrig/config.toml` on Unix/macOS, or equivalent on
    /// other platforms via `dirs::config_dir()`. Falls back to the current
    /// directory if config_dir is unavailable.
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        config_dir.join("testrig").join("config.toml")
    }

    /// Loads configuration from the default config file.
    ///
    /// A missing file is not an error; it means defaults.
    pub fn load() -> Result<Self, ConfigFileError> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigFileError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigFileError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigFileError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Checks that a configured target names a known device class.
    pub fn validate(&self) -> Result<(), ConfigFileError> {
        if let Some(name) = &self.target {
            name.parse::<Target>()
                .map(|_| ())
                .map_err(|source| ConfigFileError::Validation { source })?;
        }
        Ok(())
    }
}
