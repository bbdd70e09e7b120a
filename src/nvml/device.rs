//! NVML device implementation
//!
//! Real implementation of the GpuDevice trait using nvml-wrapper. Every
//! method is a single native query with its error classified on the way
//! out.

use crate::domain::{
    AutoBoostState, BridgeChipInfo, ClockDomain, ClockKind, ComputeMode, DriverModelState,
    InfoRomObject, MemoryCounters, OperationMode, OperationModeState, PciInfo, PcieDirection,
    PowerConstraints, ThresholdKind, UtilizationRates,
};
use crate::error::{ProbeError, ProbeResult};
use crate::nvml::classify;
use crate::nvml::raw::RawNvml;
use crate::nvml::traits::GpuDevice;

use nvml_wrapper::enum_wrappers::device::{
    Clock, InfoRom, PcieUtilCounter, TemperatureSensor, TemperatureThreshold,
};
use nvml_wrapper::Device;

/// NVML device wrapper implementing GpuDevice trait
pub struct NvmlDevice<'a> {
    device: Device<'a>,
    raw: Option<&'a RawNvml>,
}

impl<'a> NvmlDevice<'a> {
    /// Create a new NVML device wrapper
    pub fn new(device: Device<'a>, raw: Option<&'a RawNvml>) -> Self {
        Self { device, raw }
    }
}

fn nvml_clock(domain: ClockDomain) -> Clock {
    match domain {
        ClockDomain::Graphics => Clock::Graphics,
        ClockDomain::Sm => Clock::SM,
        ClockDomain::Memory => Clock::Memory,
    }
}

fn operation_mode(mode: nvml_wrapper::enum_wrappers::device::OperationMode) -> OperationMode {
    use nvml_wrapper::enum_wrappers::device::OperationMode as Gom;
    match mode {
        Gom::AllOn => OperationMode::AllOn,
        Gom::Compute => OperationMode::Compute,
        Gom::LowDP => OperationMode::LowDoublePrecision,
    }
}

impl GpuDevice for NvmlDevice<'_> {
    fn name(&self) -> ProbeResult<String> {
        self.device.name().map_err(classify)
    }

    fn brand(&self) -> ProbeResult<u32> {
        match self.device.brand() {
            Ok(brand) => Ok(brand.as_c()),
            // Hand undocumented codes to the registry, which rejects them
            Err(nvml_wrapper::error::NvmlError::UnexpectedVariant(code)) => Ok(code),
            Err(e) => Err(classify(e)),
        }
    }

    fn pci_info(&self) -> ProbeResult<PciInfo> {
        let pci = self.device.pci_info().map_err(classify)?;
        Ok(PciInfo {
            domain: pci.domain,
            bus: pci.bus,
            device: pci.device,
            pci_device_id: pci.pci_device_id,
            pci_sub_system_id: pci.pci_sub_system_id.unwrap_or_default(),
            bus_id: pci.bus_id,
        })
    }

    fn serial(&self) -> ProbeResult<String> {
        self.device.serial().map_err(classify)
    }

    fn uuid(&self) -> ProbeResult<String> {
        self.device.uuid().map_err(classify)
    }

    #[cfg(target_os = "linux")]
    fn minor_number(&self) -> ProbeResult<u32> {
        self.device.minor_number().map_err(classify)
    }

    #[cfg(not(target_os = "linux"))]
    fn minor_number(&self) -> ProbeResult<u32> {
        Err(ProbeError::Unsupported)
    }

    fn vbios_version(&self) -> ProbeResult<String> {
        self.device.vbios_version().map_err(classify)
    }

    fn board_id(&self) -> ProbeResult<u32> {
        self.device.board_id().map_err(classify)
    }

    fn is_multi_gpu_board(&self) -> ProbeResult<bool> {
        self.device.is_multi_gpu_board().map_err(classify)
    }

    fn display_mode(&self) -> ProbeResult<bool> {
        self.device.is_display_connected().map_err(classify)
    }

    fn display_active(&self) -> ProbeResult<bool> {
        self.device.is_display_active().map_err(classify)
    }

    #[cfg(target_os = "linux")]
    fn persistence_mode(&self) -> ProbeResult<bool> {
        self.device.is_in_persistent_mode().map_err(classify)
    }

    #[cfg(not(target_os = "linux"))]
    fn persistence_mode(&self) -> ProbeResult<bool> {
        Err(ProbeError::Unsupported)
    }

    fn accounting_mode(&self) -> ProbeResult<bool> {
        self.device.is_accounting_enabled().map_err(classify)
    }

    fn accounting_buffer_size(&self) -> ProbeResult<u32> {
        self.device.accounting_buffer_size().map_err(classify)
    }

    #[cfg(target_os = "windows")]
    fn driver_model(&self) -> ProbeResult<DriverModelState> {
        use crate::domain::DriverModel;
        use nvml_wrapper::enum_wrappers::device::DriverModel as Native;

        let convert = |model: Native| match model {
            Native::WDDM => DriverModel::Wddm,
            _ => DriverModel::Tcc,
        };

        let state = self.device.driver_model().map_err(classify)?;
        Ok(DriverModelState {
            current: convert(state.current),
            pending: convert(state.pending),
        })
    }

    #[cfg(not(target_os = "windows"))]
    fn driver_model(&self) -> ProbeResult<DriverModelState> {
        // Driver models only exist on Windows
        Err(ProbeError::Unsupported)
    }

    fn gpu_operation_mode(&self) -> ProbeResult<OperationModeState> {
        let state = self.device.gpu_operation_mode().map_err(classify)?;
        Ok(OperationModeState {
            current: operation_mode(state.current),
            pending: operation_mode(state.pending),
        })
    }

    fn compute_mode(&self) -> ProbeResult<ComputeMode> {
        use nvml_wrapper::enum_wrappers::device::ComputeMode as Native;

        match self.device.compute_mode() {
            Ok(Native::Default) => Ok(ComputeMode::Default),
            Ok(Native::ExclusiveThread) => Ok(ComputeMode::ExclusiveThread),
            Ok(Native::Prohibited) => Ok(ComputeMode::Prohibited),
            Ok(Native::ExclusiveProcess) => Ok(ComputeMode::ExclusiveProcess),
            Err(nvml_wrapper::error::NvmlError::UnexpectedVariant(_)) => Ok(ComputeMode::Unknown),
            Err(e) => Err(classify(e)),
        }
    }

    fn auto_boost(&self) -> ProbeResult<AutoBoostState> {
        let info = self
            .device
            .auto_boosted_clocks_enabled()
            .map_err(classify)?;
        Ok(AutoBoostState {
            enabled: info.is_enabled,
            default_enabled: info.is_enabled_default,
        })
    }

    fn inforom_image_version(&self) -> ProbeResult<String> {
        self.device.info_rom_image_version().map_err(classify)
    }

    fn inforom_version(&self, object: InfoRomObject) -> ProbeResult<String> {
        let object = match object {
            InfoRomObject::Oem => InfoRom::OEM,
            InfoRomObject::Ecc => InfoRom::ECC,
            InfoRomObject::Power => InfoRom::Power,
        };
        self.device.info_rom_version(object).map_err(classify)
    }

    fn clock(&self, domain: ClockDomain, kind: ClockKind) -> ProbeResult<u32> {
        let clock = nvml_clock(domain);
        match kind {
            ClockKind::Current => self.device.clock_info(clock),
            ClockKind::Max => self.device.max_clock_info(clock),
            ClockKind::Applications => self.device.applications_clock(clock),
            ClockKind::DefaultApplications => self.device.default_applications_clock(clock),
        }
        .map_err(classify)
    }

    fn supported_memory_clocks(&self) -> ProbeResult<Vec<u32>> {
        self.device.supported_memory_clocks().map_err(classify)
    }

    fn supported_graphics_clocks(&self, memory_mhz: u32) -> ProbeResult<Vec<u32>> {
        self.device
            .supported_graphics_clocks(memory_mhz)
            .map_err(classify)
    }

    fn power_usage(&self) -> ProbeResult<u32> {
        self.device.power_usage().map_err(classify)
    }

    fn power_limit(&self) -> ProbeResult<u32> {
        self.device.power_management_limit().map_err(classify)
    }

    fn power_default_limit(&self) -> ProbeResult<u32> {
        self.device
            .power_management_limit_default()
            .map_err(classify)
    }

    fn enforced_power_limit(&self) -> ProbeResult<u32> {
        self.device.enforced_power_limit().map_err(classify)
    }

    fn power_limit_constraints(&self) -> ProbeResult<PowerConstraints> {
        let constraints = self
            .device
            .power_management_limit_constraints()
            .map_err(classify)?;
        Ok(PowerConstraints::new(
            constraints.min_limit,
            constraints.max_limit,
        ))
    }

    #[allow(deprecated)]
    fn power_management_mode(&self) -> ProbeResult<bool> {
        self.device
            .is_power_management_algo_active()
            .map_err(classify)
    }

    fn performance_state(&self) -> ProbeResult<u32> {
        let state = self.device.performance_state().map_err(classify)?;
        Ok(state.as_c())
    }

    fn temperature(&self) -> ProbeResult<u32> {
        self.device
            .temperature(TemperatureSensor::Gpu)
            .map_err(classify)
    }

    fn temperature_threshold(&self, kind: ThresholdKind) -> ProbeResult<u32> {
        let threshold = match kind {
            ThresholdKind::Shutdown => TemperatureThreshold::Shutdown,
            ThresholdKind::Slowdown => TemperatureThreshold::Slowdown,
        };
        self.device
            .temperature_threshold(threshold)
            .map_err(classify)
    }

    fn fan_speed(&self) -> ProbeResult<u32> {
        self.device.fan_speed(0).map_err(classify)
    }

    fn memory_info(&self) -> ProbeResult<MemoryCounters> {
        let mem = self.device.memory_info().map_err(classify)?;
        Ok(MemoryCounters::new(mem.total, mem.used))
    }

    fn bar1_memory_info(&self) -> ProbeResult<MemoryCounters> {
        let mem = self.device.bar1_memory_info().map_err(classify)?;
        Ok(MemoryCounters::new(mem.total, mem.used))
    }

    fn utilization_rates(&self) -> ProbeResult<UtilizationRates> {
        let util = self.device.utilization_rates().map_err(classify)?;
        Ok(UtilizationRates::new(util.gpu, util.memory))
    }

    fn encoder_utilization(&self) -> ProbeResult<u32> {
        let info = self.device.encoder_utilization().map_err(classify)?;
        Ok(info.utilization)
    }

    fn decoder_utilization(&self) -> ProbeResult<u32> {
        let info = self.device.decoder_utilization().map_err(classify)?;
        Ok(info.utilization)
    }

    fn current_pcie_link_gen(&self) -> ProbeResult<u32> {
        self.device.current_pcie_link_gen().map_err(classify)
    }

    fn max_pcie_link_gen(&self) -> ProbeResult<u32> {
        self.device.max_pcie_link_gen().map_err(classify)
    }

    fn current_pcie_link_width(&self) -> ProbeResult<u32> {
        self.device.current_pcie_link_width().map_err(classify)
    }

    fn max_pcie_link_width(&self) -> ProbeResult<u32> {
        self.device.max_pcie_link_width().map_err(classify)
    }

    fn pcie_throughput(&self, direction: PcieDirection) -> ProbeResult<u32> {
        let counter = match direction {
            PcieDirection::Tx => PcieUtilCounter::Send,
            PcieDirection::Rx => PcieUtilCounter::Receive,
        };
        self.device.pcie_throughput(counter).map_err(classify)
    }

    fn pcie_replay_counter(&self) -> ProbeResult<u32> {
        self.device.pcie_replay_counter().map_err(classify)
    }

    fn bridge_chips(&self) -> ProbeResult<Vec<BridgeChipInfo>> {
        let raw = self.raw.ok_or(ProbeError::Unsupported)?;
        // SAFETY: the handle belongs to a device borrowed from the live
        // provider, which also owns `raw`.
        unsafe { raw.bridge_chips(self.device.handle()) }
    }

    fn supported_throttle_reasons(&self) -> ProbeResult<u64> {
        if let Some(raw) = self.raw {
            // SAFETY: see bridge_chips
            return unsafe { raw.supported_throttle_reasons(self.device.handle()) };
        }
        #[allow(deprecated)]
        let reasons = self
            .device
            .supported_throttle_reasons()
            .map_err(classify)?;
        Ok(reasons.bits())
    }

    fn current_throttle_reasons(&self) -> ProbeResult<u64> {
        if let Some(raw) = self.raw {
            // SAFETY: see bridge_chips
            return unsafe { raw.current_throttle_reasons(self.device.handle()) };
        }
        #[allow(deprecated)]
        let reasons = self
            .device
            .current_throttle_reasons()
            .map_err(classify)?;
        Ok(reasons.bits())
    }
}
