//! Unified error types for nvprobe
//!
//! Errors come in three layers:
//!
//! - [`ProbeError`]: the outcome of one failed native query, already
//!   classified into the three kinds the aggregator cares about.
//! - [`FatalError`]: conditions that end the whole polling session.
//! - [`AppError`]: the top-level error surfaced by the binary.

use thiserror::Error;

/// Classified failure of a single native query
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProbeError {
    /// The metric does not exist for this device/driver/firmware combination
    #[error("not supported")]
    Unsupported,

    /// The provider was queried before it was initialized
    #[error("NVML is not initialized")]
    Uninitialized,

    /// Any other native failure
    #[error("{0}")]
    Other(String),
}

/// Result of a single native query
pub type ProbeResult<T> = std::result::Result<T, ProbeError>;

/// Errors that abort the polling session
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FatalError {
    /// NVML library could not be located
    #[error("NVML library not found. Is the NVIDIA driver installed?")]
    LibraryNotFound,

    /// NVML initialization failed
    #[error("Failed to initialize NVML: {0}")]
    InitializationFailed(String),

    /// NVML shutdown failed
    #[error("Failed to shut down NVML: {0}")]
    ShutdownFailed(String),

    /// A query was issued before initialization
    #[error("Attempted to access NVML without first initializing it")]
    Uninitialized,

    /// Provider-level query (device count, driver version) failed
    #[error("NVML query '{query}' failed: {reason}")]
    Provider { query: &'static str, reason: ProbeError },

    /// No device at the requested index
    #[error("GPU device not found at index {0}")]
    DeviceNotFound(u32),

    /// An identity attribute could not be resolved at enumeration time
    #[error("GPU {index}: cannot resolve {field}: {reason}")]
    IdentityUnavailable {
        index: u32,
        field: &'static str,
        reason: ProbeError,
    },

    /// The native library reported a brand code outside the documented table
    #[error("GPU {index}: unknown brand code {code}")]
    UnknownBrand { index: u32, code: u32 },

    /// Unclassified native error raised by a per-device probe
    #[error("GPU {index}: probe '{probe}' failed: {message}")]
    Native {
        index: u32,
        probe: String,
        message: String,
    },
}

impl FatalError {
    /// Lift a failed provider-level query into a fatal error
    pub fn provider(query: &'static str, reason: ProbeError) -> Self {
        match reason {
            ProbeError::Uninitialized => FatalError::Uninitialized,
            reason => FatalError::Provider { query, reason },
        }
    }

    /// Lift a failed identity query into a fatal error
    pub fn identity(index: u32, field: &'static str, reason: ProbeError) -> Self {
        match reason {
            ProbeError::Uninitialized => FatalError::Uninitialized,
            reason => FatalError::IdentityUnavailable {
                index,
                field,
                reason,
            },
        }
    }
}

/// Errors from configuration parsing and validation
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file not found
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    /// TOML parsing error
    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),
}

/// Top-level application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Session-fatal telemetry error
    #[error("{0}")]
    Fatal(#[from] FatalError),

    /// Error from configuration parsing
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error (output, config files)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_not_found_display() {
        let err = FatalError::LibraryNotFound;
        assert!(err.to_string().contains("NVIDIA driver"));
    }

    #[test]
    fn test_provider_uninitialized_collapses() {
        let err = FatalError::provider("device_count", ProbeError::Uninitialized);
        assert_eq!(err, FatalError::Uninitialized);

        let err = FatalError::provider("device_count", ProbeError::Other("boom".into()));
        assert!(matches!(err, FatalError::Provider { query: "device_count", .. }));
    }

    #[test]
    fn test_identity_error_display() {
        let err = FatalError::identity(1, "name", ProbeError::Unsupported);
        assert_eq!(err.to_string(), "GPU 1: cannot resolve name: not supported");
    }

    #[test]
    fn test_unknown_brand_display() {
        let err = FatalError::UnknownBrand { index: 0, code: 99 };
        assert_eq!(err.to_string(), "GPU 0: unknown brand code 99");
    }

    #[test]
    fn test_error_conversion() {
        let app_err: AppError = FatalError::Uninitialized.into();
        assert!(matches!(app_err, AppError::Fatal(FatalError::Uninitialized)));
    }
}
