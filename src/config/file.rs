//! Configuration file loading
//!
//! Handles loading configuration from TOML files.

use crate::config::Config;
use crate::error::ConfigError;

use std::path::{Path, PathBuf};

/// Configuration file handler
pub struct ConfigFile;

impl ConfigFile {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound(path.display().to_string()))?;

        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration from default locations
    ///
    /// Later paths are more specific; the first readable one wins, searched
    /// from the most specific down. Returns the path it was loaded from.
    pub fn load_default() -> Option<(PathBuf, Config)> {
        for path in Self::default_paths().into_iter().rev() {
            if !path.exists() {
                continue;
            }
            match Self::load(&path) {
                Ok(config) => return Some((path, config)),
                Err(e) => log::warn!("Ignoring {}: {}", path.display(), e),
            }
        }
        None
    }

    /// Get default configuration file paths, least specific first
    pub fn default_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        // System-wide config
        paths.push(PathBuf::from("/etc/nvprobe/config.toml"));

        // User config
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("nvprobe").join("config.toml"));
        }

        // Current directory
        paths.push(PathBuf::from("nvprobe.toml"));

        paths
    }
}
