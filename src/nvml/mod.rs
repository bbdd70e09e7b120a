//! NVML abstraction layer
//!
//! Provides trait-based abstractions over NVML for testability, plus the
//! single place where native errors are classified.

pub mod device;
pub mod raw;
pub mod traits;
pub mod wrapper;

pub use device::NvmlDevice;
pub use traits::{GpuDevice, TelemetryProvider};
pub use wrapper::NvmlProvider;

use crate::error::ProbeError;

/// Classify a native error into the three kinds the aggregator acts on
pub fn classify(err: nvml_wrapper::error::NvmlError) -> ProbeError {
    use nvml_wrapper::error::NvmlError as NE;
    match err {
        NE::NotSupported => ProbeError::Unsupported,
        // Older drivers do not export every entry point
        NE::FailedToLoadSymbol(_) => ProbeError::Unsupported,
        NE::Uninitialized => ProbeError::Uninitialized,
        other => ProbeError::Other(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nvml_wrapper::error::NvmlError as NE;

    #[test]
    fn test_classify_not_supported() {
        assert_eq!(classify(NE::NotSupported), ProbeError::Unsupported);
    }

    #[test]
    fn test_classify_uninitialized() {
        assert_eq!(classify(NE::Uninitialized), ProbeError::Uninitialized);
    }

    #[test]
    fn test_classify_other_keeps_message() {
        let err = classify(NE::GpuLost);
        assert!(matches!(err, ProbeError::Other(ref msg) if !msg.is_empty()));
    }
}
