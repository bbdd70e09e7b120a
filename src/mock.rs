//! Mock implementations for testing
//!
//! Provides a mock provider and device for unit testing without real
//! hardware. Every query can be made to fail individually by the name of the
//! `GpuDevice` method that issues it.

use crate::domain::{
    AutoBoostState, BridgeChipInfo, ClockDomain, ClockKind, ComputeMode, DriverModel,
    DriverModelState, InfoRomObject, MemoryCounters, OperationMode, OperationModeState, PciInfo,
    PcieDirection, PowerConstraints, ThresholdKind, UtilizationRates,
};
use crate::error::{ProbeError, ProbeResult};
use crate::nvml::{GpuDevice, TelemetryProvider};

use std::collections::HashMap;

const MIB: u64 = 1024 * 1024;

/// Every query name accepted by [`MockDevice::with_failure`]
pub const QUERIES: &[&str] = &[
    "name",
    "brand",
    "pci_info",
    "serial",
    "uuid",
    "minor_number",
    "vbios_version",
    "board_id",
    "is_multi_gpu_board",
    "display_mode",
    "display_active",
    "persistence_mode",
    "accounting_mode",
    "accounting_buffer_size",
    "driver_model",
    "gpu_operation_mode",
    "compute_mode",
    "auto_boost",
    "inforom_image_version",
    "inforom_version",
    "clock",
    "supported_memory_clocks",
    "supported_graphics_clocks",
    "power_usage",
    "power_limit",
    "power_default_limit",
    "enforced_power_limit",
    "power_limit_constraints",
    "power_management_mode",
    "performance_state",
    "temperature",
    "temperature_threshold",
    "fan_speed",
    "memory_info",
    "bar1_memory_info",
    "utilization_rates",
    "encoder_utilization",
    "decoder_utilization",
    "current_pcie_link_gen",
    "max_pcie_link_gen",
    "current_pcie_link_width",
    "max_pcie_link_width",
    "pcie_throughput",
    "pcie_replay_counter",
    "bridge_chips",
    "supported_throttle_reasons",
    "current_throttle_reasons",
];

/// Mock GPU device for testing
#[derive(Debug, Clone)]
pub struct MockDevice {
    name: String,
    brand: u32,
    pci: PciInfo,
    serial: String,
    uuid: String,
    minor_number: u32,
    vbios_version: String,
    board_id: u32,
    compute_mode: ComputeMode,
    clocks: HashMap<(ClockDomain, ClockKind), u32>,
    supported_clocks: Vec<(u32, Vec<u32>)>,
    power_usage: u32,
    temperature: u32,
    memory: MemoryCounters,
    bar1: MemoryCounters,
    utilization: UtilizationRates,
    bridge_chips: Vec<BridgeChipInfo>,
    throttle_supported: u64,
    throttle_current: u64,
    failures: HashMap<&'static str, ProbeError>,
    graphics_clock_failures: HashMap<u32, ProbeError>,
}

impl MockDevice {
    /// Create a new mock device with default values
    pub fn new(index: u32) -> Self {
        let mut clocks = HashMap::new();
        for (domain, current, max) in [
            (ClockDomain::Graphics, 1410, 1980),
            (ClockDomain::Sm, 1410, 1980),
            (ClockDomain::Memory, 1593, 1593),
        ] {
            clocks.insert((domain, ClockKind::Current), current);
            clocks.insert((domain, ClockKind::Max), max);
            clocks.insert((domain, ClockKind::Applications), current);
            clocks.insert((domain, ClockKind::DefaultApplications), current);
        }

        Self {
            name: format!("Mock GPU {}", index),
            brand: 2,
            pci: PciInfo {
                domain: 0,
                bus: index + 1,
                device: 0,
                pci_device_id: 0x20B0_10DE,
                pci_sub_system_id: 0x134F_10DE,
                bus_id: format!("00000000:{:02X}:00.0", index + 1),
            },
            serial: format!("132402{:07}", index),
            uuid: format!("GPU-MOCK-{:04}", index),
            minor_number: index,
            vbios_version: "92.00.19.00.01".to_string(),
            board_id: 2_712_847,
            compute_mode: ComputeMode::Default,
            clocks,
            supported_clocks: vec![(1593, vec![1410, 1395, 210]), (1215, vec![1005, 210])],
            power_usage: 61_234,
            temperature: 34,
            memory: MemoryCounters::new(8192 * MIB, 1024 * MIB),
            bar1: MemoryCounters::new(256 * MIB, 2 * MIB),
            utilization: UtilizationRates::new(12, 3),
            bridge_chips: Vec::new(),
            throttle_supported: 0x1FF,
            throttle_current: 0x1,
            failures: HashMap::new(),
            graphics_clock_failures: HashMap::new(),
        }
    }

    /// Builder: set name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Builder: set raw brand code
    pub fn with_brand(mut self, code: u32) -> Self {
        self.brand = code;
        self
    }

    /// Builder: set UUID
    pub fn with_uuid(mut self, uuid: impl Into<String>) -> Self {
        self.uuid = uuid.into();
        self
    }

    /// Builder: set board id
    pub fn with_board_id(mut self, board_id: u32) -> Self {
        self.board_id = board_id;
        self
    }

    /// Builder: set compute mode
    pub fn with_compute_mode(mut self, mode: ComputeMode) -> Self {
        self.compute_mode = mode;
        self
    }

    /// Builder: set one clock reading
    pub fn with_clock(mut self, domain: ClockDomain, kind: ClockKind, mhz: u32) -> Self {
        self.clocks.insert((domain, kind), mhz);
        self
    }

    /// Builder: drop one clock reading so it reports as not supported
    pub fn without_clock(mut self, domain: ClockDomain, kind: ClockKind) -> Self {
        self.clocks.remove(&(domain, kind));
        self
    }

    /// Builder: set the supported (memory clock, graphics clocks) table
    pub fn with_supported_clocks(mut self, table: Vec<(u32, Vec<u32>)>) -> Self {
        self.supported_clocks = table;
        self
    }

    /// Builder: set power draw in milliwatts
    pub fn with_power_usage(mut self, milliwatts: u32) -> Self {
        self.power_usage = milliwatts;
        self
    }

    /// Builder: set GPU temperature
    pub fn with_temperature(mut self, celsius: u32) -> Self {
        self.temperature = celsius;
        self
    }

    /// Builder: set framebuffer memory counters in bytes
    pub fn with_memory(mut self, total: u64, used: u64) -> Self {
        self.memory = MemoryCounters::new(total, used);
        self
    }

    /// Builder: set the bridge chip hierarchy
    pub fn with_bridge_chips(mut self, chips: Vec<BridgeChipInfo>) -> Self {
        self.bridge_chips = chips;
        self
    }

    /// Builder: set the supported and current throttle reason bitmasks
    pub fn with_throttle_reasons(mut self, supported: u64, current: u64) -> Self {
        self.throttle_supported = supported;
        self.throttle_current = current;
        self
    }

    /// Builder: make a query fail with the given error
    ///
    /// `query` is the `GpuDevice` method name, e.g. `"fan_speed"`.
    pub fn with_failure(mut self, query: &'static str, err: ProbeError) -> Self {
        assert!(QUERIES.contains(&query), "unknown mock query '{}'", query);
        self.failures.insert(query, err);
        self
    }

    /// Builder: mark a query as not supported
    pub fn unsupported(self, query: &'static str) -> Self {
        self.with_failure(query, ProbeError::Unsupported)
    }

    /// Builder: fail the graphics clock list for one memory clock
    pub fn with_graphics_clock_failure(mut self, memory_mhz: u32, err: ProbeError) -> Self {
        self.graphics_clock_failures.insert(memory_mhz, err);
        self
    }

    fn check(&self, query: &'static str) -> ProbeResult<()> {
        match self.failures.get(query) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

impl GpuDevice for MockDevice {
    fn name(&self) -> ProbeResult<String> {
        self.check("name")?;
        Ok(self.name.clone())
    }

    fn brand(&self) -> ProbeResult<u32> {
        self.check("brand")?;
        Ok(self.brand)
    }

    fn pci_info(&self) -> ProbeResult<PciInfo> {
        self.check("pci_info")?;
        Ok(self.pci.clone())
    }

    fn serial(&self) -> ProbeResult<String> {
        self.check("serial")?;
        Ok(self.serial.clone())
    }

    fn uuid(&self) -> ProbeResult<String> {
        self.check("uuid")?;
        Ok(self.uuid.clone())
    }

    fn minor_number(&self) -> ProbeResult<u32> {
        self.check("minor_number")?;
        Ok(self.minor_number)
    }

    fn vbios_version(&self) -> ProbeResult<String> {
        self.check("vbios_version")?;
        Ok(self.vbios_version.clone())
    }

    fn board_id(&self) -> ProbeResult<u32> {
        self.check("board_id")?;
        Ok(self.board_id)
    }

    fn is_multi_gpu_board(&self) -> ProbeResult<bool> {
        self.check("is_multi_gpu_board")?;
        Ok(false)
    }

    fn display_mode(&self) -> ProbeResult<bool> {
        self.check("display_mode")?;
        Ok(false)
    }

    fn display_active(&self) -> ProbeResult<bool> {
        self.check("display_active")?;
        Ok(false)
    }

    fn persistence_mode(&self) -> ProbeResult<bool> {
        self.check("persistence_mode")?;
        Ok(true)
    }

    fn accounting_mode(&self) -> ProbeResult<bool> {
        self.check("accounting_mode")?;
        Ok(false)
    }

    fn accounting_buffer_size(&self) -> ProbeResult<u32> {
        self.check("accounting_buffer_size")?;
        Ok(4000)
    }

    fn driver_model(&self) -> ProbeResult<DriverModelState> {
        self.check("driver_model")?;
        Ok(DriverModelState {
            current: DriverModel::Tcc,
            pending: DriverModel::Tcc,
        })
    }

    fn gpu_operation_mode(&self) -> ProbeResult<OperationModeState> {
        self.check("gpu_operation_mode")?;
        Ok(OperationModeState {
            current: OperationMode::AllOn,
            pending: OperationMode::Compute,
        })
    }

    fn compute_mode(&self) -> ProbeResult<ComputeMode> {
        self.check("compute_mode")?;
        Ok(self.compute_mode)
    }

    fn auto_boost(&self) -> ProbeResult<AutoBoostState> {
        self.check("auto_boost")?;
        Ok(AutoBoostState {
            enabled: true,
            default_enabled: true,
        })
    }

    fn inforom_image_version(&self) -> ProbeResult<String> {
        self.check("inforom_image_version")?;
        Ok("G500.0200.00.03".to_string())
    }

    fn inforom_version(&self, object: InfoRomObject) -> ProbeResult<String> {
        self.check("inforom_version")?;
        Ok(match object {
            InfoRomObject::Oem => "2.0",
            InfoRomObject::Ecc => "6.16",
            InfoRomObject::Power => "N/A",
        }
        .to_string())
    }

    fn clock(&self, domain: ClockDomain, kind: ClockKind) -> ProbeResult<u32> {
        self.check("clock")?;
        self.clocks
            .get(&(domain, kind))
            .copied()
            .ok_or(ProbeError::Unsupported)
    }

    fn supported_memory_clocks(&self) -> ProbeResult<Vec<u32>> {
        self.check("supported_memory_clocks")?;
        Ok(self.supported_clocks.iter().map(|(mem, _)| *mem).collect())
    }

    fn supported_graphics_clocks(&self, memory_mhz: u32) -> ProbeResult<Vec<u32>> {
        self.check("supported_graphics_clocks")?;
        if let Some(err) = self.graphics_clock_failures.get(&memory_mhz) {
            return Err(err.clone());
        }
        self.supported_clocks
            .iter()
            .find(|(mem, _)| *mem == memory_mhz)
            .map(|(_, graphics)| graphics.clone())
            .ok_or_else(|| ProbeError::Other("Invalid Argument".to_string()))
    }

    fn power_usage(&self) -> ProbeResult<u32> {
        self.check("power_usage")?;
        Ok(self.power_usage)
    }

    fn power_limit(&self) -> ProbeResult<u32> {
        self.check("power_limit")?;
        Ok(400_000)
    }

    fn power_default_limit(&self) -> ProbeResult<u32> {
        self.check("power_default_limit")?;
        Ok(400_000)
    }

    fn enforced_power_limit(&self) -> ProbeResult<u32> {
        self.check("enforced_power_limit")?;
        Ok(400_000)
    }

    fn power_limit_constraints(&self) -> ProbeResult<PowerConstraints> {
        self.check("power_limit_constraints")?;
        Ok(PowerConstraints::new(100_000, 400_000))
    }

    fn power_management_mode(&self) -> ProbeResult<bool> {
        self.check("power_management_mode")?;
        Ok(true)
    }

    fn performance_state(&self) -> ProbeResult<u32> {
        self.check("performance_state")?;
        Ok(0)
    }

    fn temperature(&self) -> ProbeResult<u32> {
        self.check("temperature")?;
        Ok(self.temperature)
    }

    fn temperature_threshold(&self, kind: ThresholdKind) -> ProbeResult<u32> {
        self.check("temperature_threshold")?;
        Ok(match kind {
            ThresholdKind::Shutdown => 92,
            ThresholdKind::Slowdown => 89,
        })
    }

    fn fan_speed(&self) -> ProbeResult<u32> {
        self.check("fan_speed")?;
        Ok(30)
    }

    fn memory_info(&self) -> ProbeResult<MemoryCounters> {
        self.check("memory_info")?;
        Ok(self.memory)
    }

    fn bar1_memory_info(&self) -> ProbeResult<MemoryCounters> {
        self.check("bar1_memory_info")?;
        Ok(self.bar1)
    }

    fn utilization_rates(&self) -> ProbeResult<UtilizationRates> {
        self.check("utilization_rates")?;
        Ok(self.utilization)
    }

    fn encoder_utilization(&self) -> ProbeResult<u32> {
        self.check("encoder_utilization")?;
        Ok(0)
    }

    fn decoder_utilization(&self) -> ProbeResult<u32> {
        self.check("decoder_utilization")?;
        Ok(0)
    }

    fn current_pcie_link_gen(&self) -> ProbeResult<u32> {
        self.check("current_pcie_link_gen")?;
        Ok(4)
    }

    fn max_pcie_link_gen(&self) -> ProbeResult<u32> {
        self.check("max_pcie_link_gen")?;
        Ok(4)
    }

    fn current_pcie_link_width(&self) -> ProbeResult<u32> {
        self.check("current_pcie_link_width")?;
        Ok(16)
    }

    fn max_pcie_link_width(&self) -> ProbeResult<u32> {
        self.check("max_pcie_link_width")?;
        Ok(16)
    }

    fn pcie_throughput(&self, direction: PcieDirection) -> ProbeResult<u32> {
        self.check("pcie_throughput")?;
        Ok(match direction {
            PcieDirection::Tx => 1_000,
            PcieDirection::Rx => 2_000,
        })
    }

    fn pcie_replay_counter(&self) -> ProbeResult<u32> {
        self.check("pcie_replay_counter")?;
        Ok(0)
    }

    fn bridge_chips(&self) -> ProbeResult<Vec<BridgeChipInfo>> {
        self.check("bridge_chips")?;
        Ok(self.bridge_chips.clone())
    }

    fn supported_throttle_reasons(&self) -> ProbeResult<u64> {
        self.check("supported_throttle_reasons")?;
        Ok(self.throttle_supported)
    }

    fn current_throttle_reasons(&self) -> ProbeResult<u64> {
        self.check("current_throttle_reasons")?;
        Ok(self.throttle_current)
    }
}

/// Mock telemetry provider for testing
pub struct MockProvider {
    devices: Vec<MockDevice>,
    driver_version: String,
    nvml_version: String,
    count_error: Option<ProbeError>,
}

impl MockProvider {
    /// Create a new mock provider with the specified number of devices
    pub fn new(device_count: u32) -> Self {
        Self::with_devices((0..device_count).map(MockDevice::new).collect())
    }

    /// Create a mock provider with custom devices
    pub fn with_devices(devices: Vec<MockDevice>) -> Self {
        Self {
            devices,
            driver_version: "535.154.05".to_string(),
            nvml_version: "12.535.154.05".to_string(),
            count_error: None,
        }
    }

    /// Make the device count query fail
    pub fn with_count_error(mut self, err: ProbeError) -> Self {
        self.count_error = Some(err);
        self
    }
}

impl TelemetryProvider for MockProvider {
    type Device<'a> = MockDevice;

    fn driver_version(&self) -> ProbeResult<String> {
        Ok(self.driver_version.clone())
    }

    fn nvml_version(&self) -> ProbeResult<String> {
        Ok(self.nvml_version.clone())
    }

    fn device_count(&self) -> ProbeResult<u32> {
        match &self.count_error {
            Some(err) => Err(err.clone()),
            None => Ok(self.devices.len() as u32),
        }
    }

    fn device_by_index(&self, index: u32) -> ProbeResult<Self::Device<'_>> {
        self.devices
            .get(index as usize)
            .cloned()
            .ok_or_else(|| ProbeError::Other("Invalid Argument".to_string()))
    }
}
