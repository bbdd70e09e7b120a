//! Trait definitions for telemetry queries
//!
//! These traits abstract over NVML to enable testing with mocks. Every
//! method is one native query and returns an already classified
//! [`ProbeResult`]; no native types leak through.

use crate::domain::{
    AutoBoostState, BridgeChipInfo, ClockDomain, ClockKind, ComputeMode, DriverModelState,
    InfoRomObject, MemoryCounters, OperationModeState, PciInfo, PcieDirection, PowerConstraints,
    ThresholdKind, UtilizationRates,
};
use crate::error::ProbeResult;

/// Per-device metric queries
///
/// Each query can fail on its own; callers decide how a failure is
/// recorded.
pub trait GpuDevice {
    // Identity
    /// Product name
    fn name(&self) -> ProbeResult<String>;

    /// Raw native brand code
    fn brand(&self) -> ProbeResult<u32>;

    /// PCI location
    fn pci_info(&self) -> ProbeResult<PciInfo>;

    // Board
    fn serial(&self) -> ProbeResult<String>;

    fn uuid(&self) -> ProbeResult<String>;

    /// Minor number of the `/dev/nvidiaN` node
    fn minor_number(&self) -> ProbeResult<u32>;

    fn vbios_version(&self) -> ProbeResult<String>;

    fn board_id(&self) -> ProbeResult<u32>;

    fn is_multi_gpu_board(&self) -> ProbeResult<bool>;

    // Modes
    fn display_mode(&self) -> ProbeResult<bool>;

    fn display_active(&self) -> ProbeResult<bool>;

    fn persistence_mode(&self) -> ProbeResult<bool>;

    fn accounting_mode(&self) -> ProbeResult<bool>;

    fn accounting_buffer_size(&self) -> ProbeResult<u32>;

    /// Current and pending driver model (Windows only)
    fn driver_model(&self) -> ProbeResult<DriverModelState>;

    /// Current and pending GPU operation mode
    fn gpu_operation_mode(&self) -> ProbeResult<OperationModeState>;

    fn compute_mode(&self) -> ProbeResult<ComputeMode>;

    /// Current and default auto boost state
    fn auto_boost(&self) -> ProbeResult<AutoBoostState>;

    // InfoROM
    fn inforom_image_version(&self) -> ProbeResult<String>;

    fn inforom_version(&self, object: InfoRomObject) -> ProbeResult<String>;

    // Clocks
    /// Clock rate in MHz
    fn clock(&self, domain: ClockDomain, kind: ClockKind) -> ProbeResult<u32>;

    /// Supported memory clocks in MHz
    fn supported_memory_clocks(&self) -> ProbeResult<Vec<u32>>;

    /// Graphics clocks (MHz) that can be paired with a memory clock
    fn supported_graphics_clocks(&self, memory_mhz: u32) -> ProbeResult<Vec<u32>>;

    // Power, all in milliwatts
    fn power_usage(&self) -> ProbeResult<u32>;

    fn power_limit(&self) -> ProbeResult<u32>;

    fn power_default_limit(&self) -> ProbeResult<u32>;

    fn enforced_power_limit(&self) -> ProbeResult<u32>;

    fn power_limit_constraints(&self) -> ProbeResult<PowerConstraints>;

    fn power_management_mode(&self) -> ProbeResult<bool>;

    /// Performance state number (0 = P0)
    fn performance_state(&self) -> ProbeResult<u32>;

    // Thermal
    /// GPU core temperature in Celsius
    fn temperature(&self) -> ProbeResult<u32>;

    fn temperature_threshold(&self, kind: ThresholdKind) -> ProbeResult<u32>;

    /// Speed of the first fan in percent
    fn fan_speed(&self) -> ProbeResult<u32>;

    // Memory
    fn memory_info(&self) -> ProbeResult<MemoryCounters>;

    fn bar1_memory_info(&self) -> ProbeResult<MemoryCounters>;

    // Utilization
    fn utilization_rates(&self) -> ProbeResult<UtilizationRates>;

    fn encoder_utilization(&self) -> ProbeResult<u32>;

    fn decoder_utilization(&self) -> ProbeResult<u32>;

    // PCIe
    fn current_pcie_link_gen(&self) -> ProbeResult<u32>;

    fn max_pcie_link_gen(&self) -> ProbeResult<u32>;

    fn current_pcie_link_width(&self) -> ProbeResult<u32>;

    fn max_pcie_link_width(&self) -> ProbeResult<u32>;

    /// Throughput in KB/s
    fn pcie_throughput(&self, direction: PcieDirection) -> ProbeResult<u32>;

    fn pcie_replay_counter(&self) -> ProbeResult<u32>;

    /// Bridge chip hierarchy, nearest chip first
    fn bridge_chips(&self) -> ProbeResult<Vec<BridgeChipInfo>>;

    // Throttling
    /// Bitmask of throttle reasons the device can report
    fn supported_throttle_reasons(&self) -> ProbeResult<u64>;

    /// Bitmask of throttle reasons active right now
    fn current_throttle_reasons(&self) -> ProbeResult<u64>;
}

/// Process-wide telemetry provider
///
/// Devices borrow the provider, so they cannot outlive it.
pub trait TelemetryProvider {
    /// The device type returned by this provider
    type Device<'a>: GpuDevice
    where
        Self: 'a;

    /// Installed driver version
    fn driver_version(&self) -> ProbeResult<String>;

    /// NVML library version
    fn nvml_version(&self) -> ProbeResult<String>;

    /// Number of devices visible to the provider
    fn device_count(&self) -> ProbeResult<u32>;

    /// Get a device by zero-based index
    fn device_by_index(&self, index: u32) -> ProbeResult<Self::Device<'_>>;
}
