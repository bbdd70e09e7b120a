//! Domain models for nvprobe
//!
//! Probe inputs (which clock, which threshold, ...), raw values returned by
//! the provider, and the strongly typed snapshot groups built from them.

pub mod clock;
pub mod identity;
pub mod inforom;
pub mod memory;
pub mod metric;
pub mod modes;
pub mod pcie;
pub mod power;
pub mod snapshot;
pub mod thermal;
pub mod throttle;
pub mod utilization;

pub use clock::{AutoBoostState, ClockDomain, ClockKind, ClockSet, ClockSnapshot, SupportedClocks};
pub use identity::{Brand, Identity, PciInfo};
pub use inforom::{InfoRomObject, InfoRomVersions};
pub use memory::{MemoryCounters, MemorySnapshot, MemoryUsage};
pub use metric::{DegradedReason, MetricResult, Reading};
pub use modes::{
    ComputeMode, DriverModel, DriverModelState, ModeSnapshot, OperationMode, OperationModeState,
};
pub use pcie::{BridgeChip, BridgeChipInfo, PcieDirection, PcieSnapshot};
pub use power::{PowerConstraints, PowerSnapshot};
pub use snapshot::DeviceSnapshot;
pub use thermal::{ThermalSnapshot, ThresholdKind};
pub use throttle::{ThrottleReason, ThrottleReasons};
pub use utilization::{UtilizationRates, UtilizationSnapshot};
