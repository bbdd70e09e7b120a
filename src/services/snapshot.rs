//! Device snapshot aggregator
//!
//! Runs the full probe catalog against one device handle and assembles a
//! [`DeviceSnapshot`]. Each probe is isolated: an unsupported metric turns
//! into one degraded field and the remaining probes still run. Only
//! session-fatal outcomes abort the snapshot, and then no partial snapshot
//! is returned.

use crate::config::ErrorPolicy;
use crate::domain::clock::{format_mhz, format_on_off};
use crate::domain::memory::MemoryUsage;
use crate::domain::metric::format_enabled;
use crate::domain::pcie::format_kbps;
use crate::domain::power::{format_management_mode, format_pstate, format_watts};
use crate::domain::snapshot::format_board_id;
use crate::domain::thermal::{format_celsius, format_percent};
use crate::domain::{
    BridgeChip, ClockDomain, ClockKind, ClockSet, ClockSnapshot, DeviceSnapshot, InfoRomObject,
    InfoRomVersions, MemorySnapshot, MetricResult, ModeSnapshot, PcieDirection, PcieSnapshot,
    PowerSnapshot, Reading, SupportedClocks, ThermalSnapshot, ThresholdKind, ThrottleReasons,
    UtilizationSnapshot,
};
use crate::error::FatalError;
use crate::nvml::GpuDevice;
use crate::services::probe::Prober;
use crate::services::registry::DeviceHandle;

/// Builds device snapshots
#[derive(Debug, Clone, Copy, Default)]
pub struct SnapshotAggregator {
    policy: ErrorPolicy,
}

impl SnapshotAggregator {
    /// Create an aggregator applying `policy` to unclassified native errors
    pub fn new(policy: ErrorPolicy) -> Self {
        Self { policy }
    }

    /// Take a snapshot of one device
    ///
    /// `Err` is only returned for session-fatal conditions.
    pub fn snapshot<D: GpuDevice>(
        &self,
        handle: &DeviceHandle<D>,
    ) -> Result<DeviceSnapshot, FatalError> {
        let prober = Prober::new(handle.index(), self.policy);
        let device = handle.device();

        log::debug!("Snapshotting GPU {}", handle.index());

        Ok(DeviceSnapshot {
            index: handle.index(),
            serial: prober.run("serial", || device.serial())?,
            uuid: prober.run("uuid", || device.uuid())?,
            minor_number: prober.run("minor_number", || device.minor_number())?,
            vbios_version: prober.run("vbios_version", || device.vbios_version())?,
            board_id: prober.run("board_id", || device.board_id())?.map(format_board_id),
            multi_gpu_board: prober.run("multi_gpu_board", || device.is_multi_gpu_board())?,
            modes: modes(&prober, device)?,
            inforom: inforom(&prober, device)?,
            clocks: clocks(&prober, device)?,
            power: power(&prober, device)?,
            thermal: thermal(&prober, device)?,
            memory: memory(&prober, device)?,
            utilization: utilization(&prober, device)?,
            pcie: pcie(&prober, device)?,
            throttle_reasons: throttle_reasons(&prober, device)?,
        })
    }
}

fn modes<D: GpuDevice>(prober: &Prober, device: &D) -> Result<ModeSnapshot, FatalError> {
    let (driver_model_current, driver_model_pending) = prober
        .run("driver_model", || device.driver_model())?
        .map(|state| (state.current, state.pending))
        .split();

    let (gpu_operation_mode_current, gpu_operation_mode_pending) = prober
        .run("gpu_operation_mode", || device.gpu_operation_mode())?
        .map(|state| (state.current, state.pending))
        .split();

    Ok(ModeSnapshot {
        display_mode: prober
            .run("display_mode", || device.display_mode())?
            .map(format_enabled),
        display_active: prober
            .run("display_active", || device.display_active())?
            .map(format_enabled),
        persistence_mode: prober
            .run("persistence_mode", || device.persistence_mode())?
            .map(format_enabled),
        accounting_mode: prober
            .run("accounting_mode", || device.accounting_mode())?
            .map(format_enabled),
        accounting_buffer_size: prober
            .run("accounting_buffer_size", || device.accounting_buffer_size())?,
        driver_model_current,
        driver_model_pending,
        gpu_operation_mode_current,
        gpu_operation_mode_pending,
        compute_mode: prober
            .run("compute_mode", || device.compute_mode())?
            .map(|mode| Reading::new(mode, mode.as_str())),
    })
}

fn inforom<D: GpuDevice>(prober: &Prober, device: &D) -> Result<InfoRomVersions, FatalError> {
    Ok(InfoRomVersions {
        image: prober.run("inforom_image", || device.inforom_image_version())?,
        oem: prober.run("inforom_oem", || device.inforom_version(InfoRomObject::Oem))?,
        ecc: prober.run("inforom_ecc", || device.inforom_version(InfoRomObject::Ecc))?,
        power: prober.run("inforom_power", || {
            device.inforom_version(InfoRomObject::Power)
        })?,
    })
}

fn clock_set<D: GpuDevice>(
    prober: &Prober,
    device: &D,
    domain: ClockDomain,
) -> Result<ClockSet, FatalError> {
    let read = |kind: ClockKind| {
        let name = format!("clock_{:?}_{:?}", domain, kind).to_lowercase();
        prober
            .run(&name, || device.clock(domain, kind))
            .map(|mhz| mhz.map(format_mhz))
    };

    Ok(ClockSet {
        current: read(ClockKind::Current)?,
        max: read(ClockKind::Max)?,
        applications: read(ClockKind::Applications)?,
        default_applications: read(ClockKind::DefaultApplications)?,
    })
}

fn supported_clocks<D: GpuDevice>(
    prober: &Prober,
    device: &D,
) -> Result<MetricResult<Vec<SupportedClocks>>, FatalError> {
    let memory_clocks = match prober.run("supported_memory_clocks", || {
        device.supported_memory_clocks()
    })? {
        MetricResult::Ok(clocks) => clocks,
        MetricResult::Degraded(reason) => return Ok(MetricResult::Degraded(reason)),
    };

    let mut table = Vec::with_capacity(memory_clocks.len());
    for memory_mhz in memory_clocks {
        // A failed inner list degrades only its own entry
        let graphics_mhz = prober.run("supported_graphics_clocks", || {
            device.supported_graphics_clocks(memory_mhz)
        })?;
        table.push(SupportedClocks {
            memory_mhz,
            graphics_mhz,
        });
    }

    Ok(MetricResult::Ok(table))
}

fn clocks<D: GpuDevice>(prober: &Prober, device: &D) -> Result<ClockSnapshot, FatalError> {
    let (auto_boost, auto_boost_default) = prober
        .run("auto_boost", || device.auto_boost())?
        .map(|state| (format_on_off(state.enabled), format_on_off(state.default_enabled)))
        .split();

    Ok(ClockSnapshot {
        graphics: clock_set(prober, device, ClockDomain::Graphics)?,
        sm: clock_set(prober, device, ClockDomain::Sm)?,
        memory: clock_set(prober, device, ClockDomain::Memory)?,
        auto_boost,
        auto_boost_default,
        supported: supported_clocks(prober, device)?,
    })
}

fn power<D: GpuDevice>(prober: &Prober, device: &D) -> Result<PowerSnapshot, FatalError> {
    let (min_limit, max_limit) = prober
        .run("power_limit_constraints", || device.power_limit_constraints())?
        .map(|c| (format_watts(c.min_limit), format_watts(c.max_limit)))
        .split();

    Ok(PowerSnapshot {
        draw: prober
            .run("power_draw", || device.power_usage())?
            .map(format_watts),
        management_mode: prober
            .run("power_management_mode", || device.power_management_mode())?
            .map(format_management_mode),
        limit: prober
            .run("power_limit", || device.power_limit())?
            .map(format_watts),
        default_limit: prober
            .run("power_default_limit", || device.power_default_limit())?
            .map(format_watts),
        enforced_limit: prober
            .run("enforced_power_limit", || device.enforced_power_limit())?
            .map(format_watts),
        min_limit,
        max_limit,
        performance_state: prober
            .run("performance_state", || device.performance_state())?
            .map(format_pstate),
    })
}

fn thermal<D: GpuDevice>(prober: &Prober, device: &D) -> Result<ThermalSnapshot, FatalError> {
    Ok(ThermalSnapshot {
        current: prober
            .run("temperature", || device.temperature())?
            .map(format_celsius),
        shutdown_threshold: prober
            .run("temperature_shutdown", || {
                device.temperature_threshold(ThresholdKind::Shutdown)
            })?
            .map(format_celsius),
        slowdown_threshold: prober
            .run("temperature_slowdown", || {
                device.temperature_threshold(ThresholdKind::Slowdown)
            })?
            .map(format_celsius),
        fan_speed: prober
            .run("fan_speed", || device.fan_speed())?
            .map(format_percent),
    })
}

fn memory<D: GpuDevice>(prober: &Prober, device: &D) -> Result<MemorySnapshot, FatalError> {
    Ok(MemorySnapshot {
        main: prober
            .run("memory_info", || device.memory_info())?
            .map(MemoryUsage::from),
        bar1: prober
            .run("bar1_memory_info", || device.bar1_memory_info())?
            .map(MemoryUsage::from),
    })
}

fn utilization<D: GpuDevice>(
    prober: &Prober,
    device: &D,
) -> Result<UtilizationSnapshot, FatalError> {
    let (gpu, memory) = prober
        .run("utilization_rates", || device.utilization_rates())?
        .map(|rates| (format_percent(rates.gpu), format_percent(rates.memory)))
        .split();

    Ok(UtilizationSnapshot {
        gpu,
        memory,
        encoder: prober
            .run("encoder_utilization", || device.encoder_utilization())?
            .map(format_percent),
        decoder: prober
            .run("decoder_utilization", || device.decoder_utilization())?
            .map(format_percent),
    })
}

fn pcie<D: GpuDevice>(prober: &Prober, device: &D) -> Result<PcieSnapshot, FatalError> {
    // An empty hierarchy means there is no bridge in front of the GPU
    let bridge_chip = prober
        .run("bridge_chip", || device.bridge_chips())?
        .and_then(|chips| match chips.first() {
            Some(&chip) => MetricResult::Ok(BridgeChip::from(chip)),
            None => MetricResult::unsupported(),
        });

    Ok(PcieSnapshot {
        current_link_gen: prober.run("pcie_link_gen_current", || device.current_pcie_link_gen())?,
        max_link_gen: prober.run("pcie_link_gen_max", || device.max_pcie_link_gen())?,
        current_link_width: prober
            .run("pcie_link_width_current", || device.current_pcie_link_width())?,
        max_link_width: prober.run("pcie_link_width_max", || device.max_pcie_link_width())?,
        tx_throughput: prober
            .run("pcie_tx_throughput", || device.pcie_throughput(PcieDirection::Tx))?
            .map(format_kbps),
        rx_throughput: prober
            .run("pcie_rx_throughput", || device.pcie_throughput(PcieDirection::Rx))?
            .map(format_kbps),
        replay_counter: prober.run("pcie_replay_counter", || device.pcie_replay_counter())?,
        bridge_chip,
    })
}

fn throttle_reasons<D: GpuDevice>(
    prober: &Prober,
    device: &D,
) -> Result<ThrottleReasons, FatalError> {
    // Two reads regardless of how many reasons are known
    let masks = prober.run("throttle_reasons", || {
        let supported = device.supported_throttle_reasons()?;
        let current = device.current_throttle_reasons()?;
        Ok((supported, current))
    })?;

    Ok(ThrottleReasons::from_masks(masks))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BridgeChipInfo, ComputeMode, DegradedReason, ThrottleReason};
    use crate::error::ProbeError;
    use crate::mock::{MockDevice, MockProvider, QUERIES};
    use crate::services::registry::DeviceRegistry;
    use serde_json::Value;
    use std::collections::BTreeSet;

    const MIB: u64 = 1024 * 1024;

    /// Queries resolved by the registry rather than the snapshot
    const IDENTITY_QUERIES: &[&str] = &["name", "brand", "pci_info"];

    const THROTTLE_FIELDS: &[&str] = &[
        "throttle_reasons.gpu_idle",
        "throttle_reasons.applications_clocks_setting",
        "throttle_reasons.sw_power_cap",
        "throttle_reasons.hw_slowdown",
        "throttle_reasons.sync_boost",
        "throttle_reasons.sw_thermal_slowdown",
        "throttle_reasons.hw_thermal_slowdown",
        "throttle_reasons.hw_power_brake_slowdown",
        "throttle_reasons.display_clock_setting",
        "throttle_reasons.unknown",
    ];

    /// Snapshot fields fed by each device query
    const QUERY_FIELDS: &[(&str, &[&str])] = &[
        ("serial", &["serial"]),
        ("uuid", &["uuid"]),
        ("minor_number", &["minor_number"]),
        ("vbios_version", &["vbios_version"]),
        ("board_id", &["board_id"]),
        ("is_multi_gpu_board", &["multi_gpu_board"]),
        ("display_mode", &["modes.display_mode"]),
        ("display_active", &["modes.display_active"]),
        ("persistence_mode", &["modes.persistence_mode"]),
        ("accounting_mode", &["modes.accounting_mode"]),
        ("accounting_buffer_size", &["modes.accounting_buffer_size"]),
        (
            "driver_model",
            &["modes.driver_model_current", "modes.driver_model_pending"],
        ),
        (
            "gpu_operation_mode",
            &[
                "modes.gpu_operation_mode_current",
                "modes.gpu_operation_mode_pending",
            ],
        ),
        ("compute_mode", &["modes.compute_mode"]),
        ("auto_boost", &["clocks.auto_boost", "clocks.auto_boost_default"]),
        ("inforom_image_version", &["inforom.image"]),
        (
            "inforom_version",
            &["inforom.oem", "inforom.ecc", "inforom.power"],
        ),
        (
            "clock",
            &[
                "clocks.graphics.current",
                "clocks.graphics.max",
                "clocks.graphics.applications",
                "clocks.graphics.default_applications",
                "clocks.sm.current",
                "clocks.sm.max",
                "clocks.sm.applications",
                "clocks.sm.default_applications",
                "clocks.memory.current",
                "clocks.memory.max",
                "clocks.memory.applications",
                "clocks.memory.default_applications",
            ],
        ),
        ("supported_memory_clocks", &["clocks.supported"]),
        (
            "supported_graphics_clocks",
            &[
                "clocks.supported.0.graphics_mhz",
                "clocks.supported.1.graphics_mhz",
            ],
        ),
        ("power_usage", &["power.draw"]),
        ("power_limit", &["power.limit"]),
        ("power_default_limit", &["power.default_limit"]),
        ("enforced_power_limit", &["power.enforced_limit"]),
        (
            "power_limit_constraints",
            &["power.min_limit", "power.max_limit"],
        ),
        ("power_management_mode", &["power.management_mode"]),
        ("performance_state", &["power.performance_state"]),
        ("temperature", &["thermal.current"]),
        (
            "temperature_threshold",
            &["thermal.shutdown_threshold", "thermal.slowdown_threshold"],
        ),
        ("fan_speed", &["thermal.fan_speed"]),
        ("memory_info", &["memory.main"]),
        ("bar1_memory_info", &["memory.bar1"]),
        (
            "utilization_rates",
            &["utilization.gpu", "utilization.memory"],
        ),
        ("encoder_utilization", &["utilization.encoder"]),
        ("decoder_utilization", &["utilization.decoder"]),
        ("current_pcie_link_gen", &["pcie.current_link_gen"]),
        ("max_pcie_link_gen", &["pcie.max_link_gen"]),
        ("current_pcie_link_width", &["pcie.current_link_width"]),
        ("max_pcie_link_width", &["pcie.max_link_width"]),
        (
            "pcie_throughput",
            &["pcie.tx_throughput", "pcie.rx_throughput"],
        ),
        ("pcie_replay_counter", &["pcie.replay_counter"]),
        ("bridge_chips", &["pcie.bridge_chip"]),
        ("supported_throttle_reasons", THROTTLE_FIELDS),
        ("current_throttle_reasons", THROTTLE_FIELDS),
    ];

    /// A device on which every query succeeds
    fn fully_supported_device() -> MockDevice {
        MockDevice::new(0)
            .with_bridge_chips(vec![BridgeChipInfo {
                chip_type: 0,
                fw_version: 43,
            }])
            .with_throttle_reasons(0x1FF | ThrottleReason::Unknown.mask(), 0x1)
    }

    /// Dotted paths of every degraded field in the serialized snapshot
    fn degraded_fields(snapshot: &DeviceSnapshot) -> BTreeSet<String> {
        fn walk(value: &Value, path: &str, out: &mut BTreeSet<String>) {
            match value {
                Value::Object(map) if map.len() == 1 && map.contains_key("degraded") => {
                    out.insert(path.to_string());
                }
                Value::Object(map) => {
                    for (key, child) in map {
                        let child_path = match (key.as_str(), path) {
                            ("ok", _) => path.to_string(),
                            (_, "") => key.clone(),
                            _ => format!("{}.{}", path, key),
                        };
                        walk(child, &child_path, out);
                    }
                }
                Value::Array(items) => {
                    for (i, item) in items.iter().enumerate() {
                        walk(item, &format!("{}.{}", path, i), out);
                    }
                }
                _ => {}
            }
        }

        let mut out = BTreeSet::new();
        walk(&serde_json::to_value(snapshot).unwrap(), "", &mut out);
        out
    }

    fn snapshot_of(device: MockDevice, policy: ErrorPolicy) -> Result<DeviceSnapshot, FatalError> {
        let provider = MockProvider::with_devices(vec![device]);
        let registry = DeviceRegistry::enumerate(&provider).unwrap();
        SnapshotAggregator::new(policy).snapshot(&registry.handles()[0])
    }

    #[test]
    fn test_supported_fields_match_raw_readings() {
        let snapshot = snapshot_of(
            MockDevice::new(0)
                .with_uuid("GPU-1d2c3b4a-0000-1111-2222-333344445555")
                .with_clock(ClockDomain::Sm, ClockKind::Current, 1755)
                .with_power_usage(35_123)
                .with_temperature(67),
            ErrorPolicy::Fatal,
        )
        .unwrap();

        let sm = snapshot.clocks.sm.current.value().unwrap();
        assert_eq!(sm.value, 1755);
        assert_eq!(sm.text, "1755 MHz");

        let draw = snapshot.power.draw.value().unwrap();
        assert_eq!(draw.value, 35_123);
        assert_eq!(draw.text, "35.12 W");

        assert_eq!(snapshot.thermal.current.to_string(), "67 C");
        assert_eq!(
            snapshot.uuid,
            MetricResult::Ok("GPU-1d2c3b4a-0000-1111-2222-333344445555".to_string())
        );
        assert_eq!(snapshot.power.performance_state.to_string(), "P0");
        assert_eq!(snapshot.modes.persistence_mode.to_string(), "Enabled");
        assert_eq!(snapshot.clocks.auto_boost.to_string(), "On");
    }

    #[test]
    fn test_unsupported_probe_is_isolated() {
        let snapshot = snapshot_of(
            MockDevice::new(0).unsupported("fan_speed"),
            ErrorPolicy::Fatal,
        )
        .unwrap();

        assert_eq!(
            snapshot.thermal.fan_speed.reason(),
            Some(&DegradedReason::Unsupported)
        );
        assert_eq!(snapshot.thermal.fan_speed.to_string(), "Not Supported");
        assert!(snapshot.thermal.current.is_ok());
        assert!(snapshot.thermal.shutdown_threshold.is_ok());
        assert!(snapshot.memory.main.is_ok());
        assert!(snapshot.pcie.current_link_gen.is_ok());
    }

    #[test]
    fn test_fully_supported_device_has_no_degraded_fields() {
        let snapshot = snapshot_of(fully_supported_device(), ErrorPolicy::Fatal).unwrap();
        assert_eq!(degraded_fields(&snapshot), BTreeSet::new());
    }

    #[test]
    fn test_each_unsupported_query_degrades_only_its_fields() {
        for &(query, fields) in QUERY_FIELDS {
            let device = fully_supported_device().unsupported(query);
            let snapshot = snapshot_of(device, ErrorPolicy::Fatal)
                .unwrap_or_else(|e| panic!("{}: {}", query, e));

            let expected: BTreeSet<String> = fields.iter().map(|f| f.to_string()).collect();
            assert!(!expected.is_empty(), "{} feeds no field", query);
            assert_eq!(degraded_fields(&snapshot), expected, "query {}", query);
        }
    }

    #[test]
    fn test_every_device_query_is_in_the_table() {
        let mut covered: BTreeSet<&str> = IDENTITY_QUERIES.iter().copied().collect();
        covered.extend(QUERY_FIELDS.iter().map(|&(query, _)| query));
        let all: BTreeSet<&str> = QUERIES.iter().copied().collect();
        assert_eq!(covered, all);
        assert_eq!(QUERY_FIELDS.len() + IDENTITY_QUERIES.len(), QUERIES.len());
    }

    #[test]
    fn test_memory_clock_failure_does_not_block_sm_clock() {
        let snapshot = snapshot_of(
            MockDevice::new(0)
                .without_clock(ClockDomain::Memory, ClockKind::Current)
                .with_clock(ClockDomain::Sm, ClockKind::Current, 1500),
            ErrorPolicy::Fatal,
        )
        .unwrap();

        assert_eq!(snapshot.clocks.memory.current, MetricResult::unsupported());
        assert!(snapshot.clocks.memory.max.is_ok());
        assert_eq!(snapshot.clocks.sm.current.to_string(), "1500 MHz");
    }

    #[test]
    fn test_uninitialized_aborts_snapshot() {
        let result = snapshot_of(
            MockDevice::new(0).with_failure("temperature", ProbeError::Uninitialized),
            ErrorPolicy::Degrade,
        );
        assert_eq!(result, Err(FatalError::Uninitialized));
    }

    #[test]
    fn test_other_error_is_fatal_by_default() {
        let result = snapshot_of(
            MockDevice::new(0).with_failure("power_usage", ProbeError::Other("GPU is lost".into())),
            ErrorPolicy::Fatal,
        );
        assert!(matches!(
            result,
            Err(FatalError::Native { index: 0, ref probe, .. }) if probe == "power_draw"
        ));
    }

    #[test]
    fn test_other_error_degrades_under_degrade_policy() {
        let snapshot = snapshot_of(
            MockDevice::new(0).with_failure("power_usage", ProbeError::Other("GPU is lost".into())),
            ErrorPolicy::Degrade,
        )
        .unwrap();
        assert_eq!(snapshot.power.draw.to_string(), "GPU is lost");
        assert!(snapshot.power.limit.is_ok());
    }

    #[test]
    fn test_board_id_hex() {
        let snapshot =
            snapshot_of(MockDevice::new(0).with_board_id(2_712_847), ErrorPolicy::Fatal).unwrap();
        assert_eq!(snapshot.board_id.to_string(), "0x296def");
    }

    #[test]
    fn test_bridge_chip() {
        let snapshot = snapshot_of(
            MockDevice::new(0).with_bridge_chips(vec![BridgeChipInfo {
                chip_type: 1,
                fw_version: 43,
            }]),
            ErrorPolicy::Fatal,
        )
        .unwrap();
        let chip = snapshot.pcie.bridge_chip.value().unwrap();
        assert_eq!(chip.chip_type, "BR04");
        assert_eq!(chip.firmware, "0000002B");

        let snapshot = snapshot_of(
            MockDevice::new(0).with_bridge_chips(vec![BridgeChipInfo {
                chip_type: 0,
                fw_version: 0,
            }]),
            ErrorPolicy::Fatal,
        )
        .unwrap();
        let chip = snapshot.pcie.bridge_chip.value().unwrap();
        assert_eq!(chip.chip_type, "PLX");
        assert_eq!(chip.firmware, "N/A");
    }

    #[test]
    fn test_no_bridge_is_unsupported() {
        let snapshot = snapshot_of(MockDevice::new(0), ErrorPolicy::Fatal).unwrap();
        assert_eq!(snapshot.pcie.bridge_chip, MetricResult::unsupported());
    }

    #[test]
    fn test_memory_free_is_exact() {
        let snapshot = snapshot_of(
            MockDevice::new(0).with_memory(8_589_934_592, 1_073_741_824),
            ErrorPolicy::Fatal,
        )
        .unwrap();
        let main = snapshot.memory.main.value().unwrap();
        assert_eq!(main.free.value, 8_589_934_592 - 1_073_741_824);
        assert_eq!(main.free.text, format!("{} MiB", main.free.value / MIB));
        assert_eq!(main.total.text, "8192 MiB");
        assert_eq!(main.used.text, "1024 MiB");
        assert_eq!(main.free.text, "7168 MiB");
    }

    #[test]
    fn test_split_probes_share_outcome() {
        let snapshot = snapshot_of(
            MockDevice::new(0).unsupported("utilization_rates"),
            ErrorPolicy::Fatal,
        )
        .unwrap();
        assert!(snapshot.utilization.gpu.is_degraded());
        assert!(snapshot.utilization.memory.is_degraded());
        assert!(snapshot.utilization.encoder.is_ok());

        let snapshot = snapshot_of(MockDevice::new(0), ErrorPolicy::Fatal).unwrap();
        assert_eq!(snapshot.power.min_limit.to_string(), "100.00 W");
        assert_eq!(snapshot.power.max_limit.to_string(), "400.00 W");
        assert_eq!(snapshot.utilization.gpu.to_string(), "12 %");
    }

    #[test]
    fn test_throttle_reasons() {
        let supported = ThrottleReason::GpuIdle.mask() | ThrottleReason::HwSlowdown.mask();
        let snapshot = snapshot_of(
            MockDevice::new(0).with_throttle_reasons(supported, ThrottleReason::HwSlowdown.mask()),
            ErrorPolicy::Fatal,
        )
        .unwrap();

        let reasons = &snapshot.throttle_reasons;
        assert_eq!(reasons.iter().count(), ThrottleReason::ALL.len() - 1);
        assert_eq!(reasons.gpu_idle, MetricResult::Ok(false));
        assert_eq!(reasons.hw_slowdown, MetricResult::Ok(true));
        assert_eq!(reasons.sw_power_cap, MetricResult::unsupported());
    }

    #[test]
    fn test_throttle_unknown_reason_reported() {
        let unknown = ThrottleReason::Unknown.mask();
        let snapshot = snapshot_of(
            MockDevice::new(0).with_throttle_reasons(unknown | 0x1, unknown),
            ErrorPolicy::Fatal,
        )
        .unwrap();

        let reasons = &snapshot.throttle_reasons;
        assert_eq!(reasons.unknown, MetricResult::Ok(true));
        assert_eq!(reasons.gpu_idle, MetricResult::Ok(false));
        assert_eq!(reasons.sw_power_cap, MetricResult::unsupported());
    }

    #[test]
    fn test_throttle_mask_unsupported_marks_every_reason() {
        let snapshot = snapshot_of(
            MockDevice::new(0).unsupported("current_throttle_reasons"),
            ErrorPolicy::Fatal,
        )
        .unwrap();
        assert!(snapshot
            .throttle_reasons
            .iter()
            .all(|(_, state)| *state == MetricResult::unsupported()));
    }

    #[test]
    fn test_supported_clocks_inner_failure_is_per_entry() {
        let snapshot = snapshot_of(
            MockDevice::new(0)
                .with_supported_clocks(vec![(1593, vec![1410, 1395]), (810, vec![810, 405])])
                .with_graphics_clock_failure(810, ProbeError::Unsupported),
            ErrorPolicy::Fatal,
        )
        .unwrap();

        let table = snapshot.clocks.supported.value().unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table[0].memory_mhz, 1593);
        assert_eq!(table[0].graphics_mhz, MetricResult::Ok(vec![1410, 1395]));
        assert_eq!(table[1].memory_mhz, 810);
        assert_eq!(table[1].graphics_mhz, MetricResult::unsupported());
    }

    #[test]
    fn test_supported_memory_clocks_unsupported() {
        let snapshot = snapshot_of(
            MockDevice::new(0).unsupported("supported_memory_clocks"),
            ErrorPolicy::Fatal,
        )
        .unwrap();
        assert_eq!(snapshot.clocks.supported, MetricResult::unsupported());
    }

    #[test]
    fn test_compute_mode_string() {
        let snapshot = snapshot_of(
            MockDevice::new(0).with_compute_mode(ComputeMode::ExclusiveProcess),
            ErrorPolicy::Fatal,
        )
        .unwrap();
        assert_eq!(snapshot.modes.compute_mode.to_string(), "Exclusive_Process");
    }

    #[test]
    fn test_driver_model_unsupported_splits() {
        let snapshot = snapshot_of(
            MockDevice::new(0).unsupported("driver_model"),
            ErrorPolicy::Fatal,
        )
        .unwrap();
        assert!(snapshot.modes.driver_model_current.is_degraded());
        assert!(snapshot.modes.driver_model_pending.is_degraded());
        assert_eq!(
            snapshot.modes.gpu_operation_mode_pending.to_string(),
            "Compute"
        );
    }

    #[test]
    fn test_snapshot_is_idempotent() {
        let provider = MockProvider::new(1);
        let registry = DeviceRegistry::enumerate(&provider).unwrap();
        let aggregator = SnapshotAggregator::new(ErrorPolicy::Fatal);
        let handle = &registry.handles()[0];

        let first = aggregator.snapshot(handle).unwrap();
        let second = aggregator.snapshot(handle).unwrap();
        assert_eq!(first, second);
    }
}
