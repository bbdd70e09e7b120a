//! Configuration system
//!
//! Handles TOML config file parsing and CLI argument merging.

pub mod builder;
pub mod file;

pub use builder::ConfigBuilder;
pub use file::ConfigFile;

use crate::cli::args::OutputFormat;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,
    /// NVML library settings
    pub provider: ProviderConfig,
    /// Probe failure handling
    pub probe: ProbeConfig,
    /// GPU selection settings
    pub gpu: GpuConfig,
    /// Report output settings
    pub output: OutputConfig,
}

/// General configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Enable verbose logging
    pub verbose: bool,
}

/// NVML library configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Explicit path to the NVML shared library
    pub library_path: Option<String>,
}

/// How a probe failure that is neither "unsupported" nor "uninitialized"
/// is handled
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// Abort the session
    #[default]
    Fatal,
    /// Record the native message in the field and keep going
    Degrade,
}

/// Probe configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    pub error_policy: ErrorPolicy,
}

/// GPU selection configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GpuConfig {
    /// Restrict the report to one device
    pub index: Option<u32>,
}

/// Output configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// List supported clock pairs in table output
    pub show_supported_clocks: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(!config.general.verbose);
        assert_eq!(config.probe.error_policy, ErrorPolicy::Fatal);
        assert!(config.provider.library_path.is_none());
        assert!(config.gpu.index.is_none());
        assert!(matches!(config.output.format, OutputFormat::Table));
    }

    #[test]
    fn test_parse_full_config() {
        let config: Config = toml::from_str(
            r#"
            [general]
            verbose = true

            [provider]
            library_path = "/opt/nvidia/libnvidia-ml.so.1"

            [probe]
            error_policy = "degrade"

            [gpu]
            index = 1

            [output]
            format = "json"
            show_supported_clocks = true
            "#,
        )
        .unwrap();

        assert!(config.general.verbose);
        assert_eq!(
            config.provider.library_path.as_deref(),
            Some("/opt/nvidia/libnvidia-ml.so.1")
        );
        assert_eq!(config.probe.error_policy, ErrorPolicy::Degrade);
        assert_eq!(config.gpu.index, Some(1));
        assert!(matches!(config.output.format, OutputFormat::Json));
        assert!(config.output.show_supported_clocks);
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: Config = toml::from_str("[gpu]\nindex = 0\n").unwrap();
        assert_eq!(config.gpu.index, Some(0));
        assert_eq!(config.probe.error_policy, ErrorPolicy::Fatal);
    }

    #[test]
    fn test_unknown_policy_rejected() {
        let result: Result<Config, _> = toml::from_str("[probe]\nerror_policy = \"ignore\"\n");
        assert!(result.is_err());
    }
}
