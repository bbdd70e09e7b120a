//! Point-in-time device snapshot
//!
//! A [`DeviceSnapshot`] is built fresh on every poll and never mutated
//! afterwards. Every field is a [`MetricResult`]; unsupported metrics are
//! marked, not omitted.

use crate::domain::clock::ClockSnapshot;
use crate::domain::inforom::InfoRomVersions;
use crate::domain::memory::MemorySnapshot;
use crate::domain::metric::{MetricResult, Reading};
use crate::domain::modes::ModeSnapshot;
use crate::domain::pcie::PcieSnapshot;
use crate::domain::power::PowerSnapshot;
use crate::domain::thermal::ThermalSnapshot;
use crate::domain::throttle::ThrottleReasons;
use crate::domain::utilization::UtilizationSnapshot;
use serde::Serialize;

/// Format a board id as `0x` followed by lowercase hex digits
pub fn format_board_id(board_id: u32) -> Reading<u32> {
    Reading::new(board_id, format!("{:#x}", board_id))
}

/// All telemetry for one device at one point in time
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceSnapshot {
    /// Index of the device the snapshot was taken from
    pub index: u32,
    pub serial: MetricResult<String>,
    pub uuid: MetricResult<String>,
    pub minor_number: MetricResult<u32>,
    pub vbios_version: MetricResult<String>,
    pub board_id: MetricResult<Reading<u32>>,
    pub multi_gpu_board: MetricResult<bool>,
    pub modes: ModeSnapshot,
    pub inforom: InfoRomVersions,
    pub clocks: ClockSnapshot,
    pub power: PowerSnapshot,
    pub thermal: ThermalSnapshot,
    pub memory: MemorySnapshot,
    pub utilization: UtilizationSnapshot,
    pub pcie: PcieSnapshot,
    pub throttle_reasons: ThrottleReasons,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::metric::DegradedReason;

    #[test]
    fn test_format_board_id() {
        let id = format_board_id(2_712_847);
        assert_eq!(id.text, "0x296def");
        assert_eq!(id.value, 2_712_847);
    }

    #[test]
    fn test_degraded_board_id_renders_reason() {
        let degraded: MetricResult<u32> = MetricResult::Degraded(DegradedReason::Unsupported);
        let rendered = degraded.map(format_board_id);
        assert_eq!(rendered.to_string(), "Not Supported");
    }
}
