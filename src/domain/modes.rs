//! Device operating modes
//!
//! Display, persistence, accounting, driver model, GPU operation mode and
//! compute mode.

use crate::domain::metric::{MetricResult, Reading};
use serde::Serialize;
use std::fmt;

/// Compute mode of a device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ComputeMode {
    /// Multiple contexts per device
    Default,
    /// One context per device, usable from one thread at a time
    ExclusiveThread,
    /// No contexts allowed
    Prohibited,
    /// One context per device, usable from many threads at a time
    ExclusiveProcess,
    /// Mode code the report has no name for
    Unknown,
}

impl ComputeMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Default => "Default",
            Self::ExclusiveThread => "Exclusive Thread",
            Self::Prohibited => "Prohibited",
            Self::ExclusiveProcess => "Exclusive_Process",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for ComputeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// GPU operation mode (GOM)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum OperationMode {
    AllOn,
    Compute,
    LowDoublePrecision,
}

impl fmt::Display for OperationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::AllOn => "All On",
            Self::Compute => "Compute",
            Self::LowDoublePrecision => "Low Double Precision",
        })
    }
}

/// Current and pending GPU operation modes, as read in one native call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationModeState {
    pub current: OperationMode,
    pub pending: OperationMode,
}

/// Windows driver model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DriverModel {
    /// Windows Display Driver Model
    Wddm,
    /// Tesla Compute Cluster
    Tcc,
}

impl fmt::Display for DriverModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Wddm => "WDDM",
            Self::Tcc => "TCC",
        })
    }
}

/// Current and pending driver models, as read in one native call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverModelState {
    pub current: DriverModel,
    pub pending: DriverModel,
}

/// Mode section of a snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModeSnapshot {
    /// Whether a display is connected
    pub display_mode: MetricResult<Reading<bool>>,
    /// Whether a display is initialized on the device
    pub display_active: MetricResult<Reading<bool>>,
    pub persistence_mode: MetricResult<Reading<bool>>,
    pub accounting_mode: MetricResult<Reading<bool>>,
    /// Number of processes the accounting buffer can hold
    pub accounting_buffer_size: MetricResult<u32>,
    pub driver_model_current: MetricResult<DriverModel>,
    pub driver_model_pending: MetricResult<DriverModel>,
    pub gpu_operation_mode_current: MetricResult<OperationMode>,
    pub gpu_operation_mode_pending: MetricResult<OperationMode>,
    pub compute_mode: MetricResult<Reading<ComputeMode>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_mode_strings() {
        assert_eq!(ComputeMode::Default.to_string(), "Default");
        assert_eq!(ComputeMode::ExclusiveThread.to_string(), "Exclusive Thread");
        assert_eq!(ComputeMode::ExclusiveProcess.to_string(), "Exclusive_Process");
    }

    #[test]
    fn test_operation_mode_strings() {
        assert_eq!(OperationMode::AllOn.to_string(), "All On");
        assert_eq!(
            OperationMode::LowDoublePrecision.to_string(),
            "Low Double Precision"
        );
    }

    #[test]
    fn test_driver_model_strings() {
        assert_eq!(DriverModel::Wddm.to_string(), "WDDM");
        assert_eq!(DriverModel::Tcc.to_string(), "TCC");
    }
}
