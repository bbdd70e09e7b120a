//! Configuration builder
//!
//! Merges configuration from files and CLI arguments.

use crate::cli::args::OutputFormat;
use crate::config::{Config, ConfigFile, ErrorPolicy};
use crate::error::ConfigError;

use std::path::{Path, PathBuf};

/// Builder for merging configuration sources
pub struct ConfigBuilder {
    config: Config,
    source: Option<PathBuf>,
}

impl ConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: Config::default(),
            source: None,
        }
    }

    /// Load configuration from a file
    ///
    /// An explicit path must load; without one the default locations are
    /// searched and a miss keeps the defaults.
    pub fn with_file(mut self, path: Option<&str>) -> Result<Self, ConfigError> {
        let file_config = match path {
            Some(path) => Some((PathBuf::from(path), ConfigFile::load(path)?)),
            None => ConfigFile::load_default(),
        };

        if let Some((source, cfg)) = file_config {
            self.config = cfg;
            self.source = Some(source);
        }

        Ok(self)
    }

    /// File the configuration was loaded from, if any
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Override with CLI verbose flag
    pub fn with_verbose(mut self, verbose: Option<bool>) -> Self {
        if let Some(v) = verbose {
            self.config.general.verbose = v;
        }
        self
    }

    /// Override with CLI library path
    pub fn with_library_path(mut self, path: Option<String>) -> Self {
        if let Some(p) = path {
            self.config.provider.library_path = Some(p);
        }
        self
    }

    /// Override with CLI error policy
    pub fn with_error_policy(mut self, policy: Option<ErrorPolicy>) -> Self {
        if let Some(p) = policy {
            self.config.probe.error_policy = p;
        }
        self
    }

    /// Override with CLI GPU index
    pub fn with_gpu_index(mut self, index: Option<u32>) -> Self {
        if let Some(i) = index {
            self.config.gpu.index = Some(i);
        }
        self
    }

    /// Override with CLI output format
    pub fn with_format(mut self, format: Option<OutputFormat>) -> Self {
        if let Some(f) = format {
            self.config.output.format = f;
        }
        self
    }

    /// Override with CLI supported clocks flag
    pub fn with_supported_clocks(mut self, show: Option<bool>) -> Self {
        if let Some(s) = show {
            self.config.output.show_supported_clocks = s;
        }
        self
    }

    /// Build the final configuration
    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let config = ConfigBuilder::new().build();
        assert!(!config.general.verbose);
        assert_eq!(config.probe.error_policy, ErrorPolicy::Fatal);
    }

    #[test]
    fn test_builder_overrides() {
        let config = ConfigBuilder::new()
            .with_verbose(Some(true))
            .with_error_policy(Some(ErrorPolicy::Degrade))
            .with_gpu_index(Some(1))
            .with_library_path(Some("/tmp/libnvidia-ml.so.1".to_string()))
            .with_format(Some(OutputFormat::Compact))
            .build();

        assert!(config.general.verbose);
        assert_eq!(config.probe.error_policy, ErrorPolicy::Degrade);
        assert_eq!(config.gpu.index, Some(1));
        assert_eq!(
            config.provider.library_path.as_deref(),
            Some("/tmp/libnvidia-ml.so.1")
        );
        assert!(matches!(config.output.format, OutputFormat::Compact));
    }

    #[test]
    fn test_none_keeps_file_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nvprobe.toml");
        std::fs::write(&path, "[probe]\nerror_policy = \"degrade\"\n[gpu]\nindex = 3\n").unwrap();

        let config = ConfigBuilder::new()
            .with_file(path.to_str())
            .unwrap()
            .with_error_policy(None)
            .with_gpu_index(None)
            .build();

        assert_eq!(config.probe.error_policy, ErrorPolicy::Degrade);
        assert_eq!(config.gpu.index, Some(3));
    }

    #[test]
    fn test_cli_wins_over_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nvprobe.toml");
        std::fs::write(&path, "[gpu]\nindex = 3\n").unwrap();

        let config = ConfigBuilder::new()
            .with_file(path.to_str())
            .unwrap()
            .with_gpu_index(Some(0))
            .build();

        assert_eq!(config.gpu.index, Some(0));
    }

    #[test]
    fn test_file_verbose_and_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nvprobe.toml");
        std::fs::write(&path, "[general]\nverbose = true\n").unwrap();

        let builder = ConfigBuilder::new().with_file(path.to_str()).unwrap();
        assert_eq!(builder.source(), Some(path.as_path()));

        let config = builder.with_verbose(None).build();
        assert!(config.general.verbose);
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let result = ConfigBuilder::new().with_file(Some("/nonexistent/nvprobe.toml"));
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }
}
