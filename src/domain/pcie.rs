//! PCIe domain types
//!
//! Link state, throughput counters and the bridge chip in front of the GPU.

use crate::domain::metric::{MetricResult, Reading};
use serde::Serialize;

/// Direction of a PCIe throughput counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PcieDirection {
    /// Bytes sent by the GPU
    Tx,
    /// Bytes received by the GPU
    Rx,
}

/// One entry of the native bridge chip hierarchy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BridgeChipInfo {
    /// Native chip type discriminant (0 = PLX, otherwise BR04)
    pub chip_type: u32,
    /// Raw firmware version, 0 when not reported
    pub fw_version: u32,
}

/// Bridge chip as shown in the report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BridgeChip {
    pub chip_type: String,
    pub firmware: String,
}

impl From<BridgeChipInfo> for BridgeChip {
    fn from(info: BridgeChipInfo) -> Self {
        Self {
            chip_type: bridge_chip_type(info.chip_type).to_string(),
            firmware: bridge_firmware(info.fw_version),
        }
    }
}

/// Name of a bridge chip type discriminant
pub fn bridge_chip_type(chip_type: u32) -> &'static str {
    if chip_type == 0 {
        "PLX"
    } else {
        "BR04"
    }
}

/// Render a bridge firmware version as 8 hex digits, `N/A` for zero
pub fn bridge_firmware(fw_version: u32) -> String {
    if fw_version == 0 {
        "N/A".to_string()
    } else {
        format!("{:08X}", fw_version)
    }
}

/// Format a throughput counter in KB/s
pub fn format_kbps(kbps: u32) -> Reading<u32> {
    Reading::new(kbps, format!("{} KB/s", kbps))
}

/// PCIe section of a snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PcieSnapshot {
    pub current_link_gen: MetricResult<u32>,
    pub max_link_gen: MetricResult<u32>,
    pub current_link_width: MetricResult<u32>,
    pub max_link_width: MetricResult<u32>,
    pub tx_throughput: MetricResult<Reading<u32>>,
    pub rx_throughput: MetricResult<Reading<u32>>,
    pub replay_counter: MetricResult<u32>,
    pub bridge_chip: MetricResult<BridgeChip>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bridge_firmware() {
        assert_eq!(bridge_firmware(0), "N/A");
        assert_eq!(bridge_firmware(43), "0000002B");
        assert_eq!(bridge_firmware(0xDEAD_BEEF), "DEADBEEF");
    }

    #[test]
    fn test_bridge_chip_type() {
        assert_eq!(bridge_chip_type(0), "PLX");
        assert_eq!(bridge_chip_type(1), "BR04");
        assert_eq!(bridge_chip_type(7), "BR04");
    }

    #[test]
    fn test_bridge_chip_from_info() {
        let chip = BridgeChip::from(BridgeChipInfo {
            chip_type: 1,
            fw_version: 43,
        });
        assert_eq!(chip.chip_type, "BR04");
        assert_eq!(chip.firmware, "0000002B");
    }
}
