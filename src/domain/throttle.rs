//! Clock throttle reasons
//!
//! The device exposes two bitmasks: the reasons it can report and the
//! reasons active right now. Each known reason becomes one tri-state field.

use crate::domain::metric::MetricResult;
use serde::Serialize;

/// A throttle reason code known to the native library
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThrottleReason {
    GpuIdle,
    /// Legacy alias of the applications clocks bit; never reported
    UserDefinedClocks,
    ApplicationsClocksSetting,
    SwPowerCap,
    HwSlowdown,
    SyncBoost,
    SwThermalSlowdown,
    HwThermalSlowdown,
    HwPowerBrakeSlowdown,
    DisplayClockSetting,
    Unknown,
}

impl ThrottleReason {
    /// Every known reason code, in native bit order
    pub const ALL: [ThrottleReason; 11] = [
        Self::GpuIdle,
        Self::UserDefinedClocks,
        Self::ApplicationsClocksSetting,
        Self::SwPowerCap,
        Self::HwSlowdown,
        Self::SyncBoost,
        Self::SwThermalSlowdown,
        Self::HwThermalSlowdown,
        Self::HwPowerBrakeSlowdown,
        Self::DisplayClockSetting,
        Self::Unknown,
    ];

    /// Native bitmask for this reason
    pub const fn mask(&self) -> u64 {
        match self {
            Self::GpuIdle => 0x0000_0000_0000_0001,
            Self::UserDefinedClocks | Self::ApplicationsClocksSetting => 0x0000_0000_0000_0002,
            Self::SwPowerCap => 0x0000_0000_0000_0004,
            Self::HwSlowdown => 0x0000_0000_0000_0008,
            Self::SyncBoost => 0x0000_0000_0000_0010,
            Self::SwThermalSlowdown => 0x0000_0000_0000_0020,
            Self::HwThermalSlowdown => 0x0000_0000_0000_0040,
            Self::HwPowerBrakeSlowdown => 0x0000_0000_0000_0080,
            Self::DisplayClockSetting => 0x0000_0000_0000_0100,
            Self::Unknown => 0x8000_0000_0000_0000,
        }
    }

    /// Report key for this reason
    pub const fn name(&self) -> &'static str {
        match self {
            Self::GpuIdle => "clocks_throttle_reason_gpu_idle",
            Self::UserDefinedClocks => "clocks_throttle_reason_user_defined_clocks",
            Self::ApplicationsClocksSetting => "clocks_throttle_reason_applications_clocks_setting",
            Self::SwPowerCap => "clocks_throttle_reason_sw_power_cap",
            Self::HwSlowdown => "clocks_throttle_reason_hw_slowdown",
            Self::SyncBoost => "clocks_throttle_reason_sync_boost",
            Self::SwThermalSlowdown => "clocks_throttle_reason_sw_thermal_slowdown",
            Self::HwThermalSlowdown => "clocks_throttle_reason_hw_thermal_slowdown",
            Self::HwPowerBrakeSlowdown => "clocks_throttle_reason_hw_power_brake_slowdown",
            Self::DisplayClockSetting => "clocks_throttle_reason_display_clock_setting",
            Self::Unknown => "clocks_throttle_reason_unknown",
        }
    }

    /// Whether the reason gets a field in the report
    pub const fn is_reported(&self) -> bool {
        !matches!(self, Self::UserDefinedClocks)
    }

    /// Evaluate this reason against the supported and current bitmasks
    ///
    /// `true` if supported and active, `false` if supported and inactive,
    /// `Unsupported` if the device cannot report it.
    pub fn evaluate(&self, supported: u64, current: u64) -> MetricResult<bool> {
        let mask = self.mask();
        if supported & mask == 0 {
            MetricResult::unsupported()
        } else {
            MetricResult::Ok(current & mask != 0)
        }
    }
}

/// Per-reason throttle state
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThrottleReasons {
    pub gpu_idle: MetricResult<bool>,
    pub applications_clocks_setting: MetricResult<bool>,
    pub sw_power_cap: MetricResult<bool>,
    pub hw_slowdown: MetricResult<bool>,
    pub sync_boost: MetricResult<bool>,
    pub sw_thermal_slowdown: MetricResult<bool>,
    pub hw_thermal_slowdown: MetricResult<bool>,
    pub hw_power_brake_slowdown: MetricResult<bool>,
    pub display_clock_setting: MetricResult<bool>,
    pub unknown: MetricResult<bool>,
}

impl ThrottleReasons {
    /// Build from the two bitmasks read from the device
    ///
    /// `masks` is the shared outcome of reading both bitmasks; if it
    /// degraded, every reason carries the same reason.
    pub fn from_masks(masks: MetricResult<(u64, u64)>) -> Self {
        let field = |reason: ThrottleReason| {
            masks
                .as_ref()
                .and_then(|&(supported, current)| reason.evaluate(supported, current))
        };

        Self {
            gpu_idle: field(ThrottleReason::GpuIdle),
            applications_clocks_setting: field(ThrottleReason::ApplicationsClocksSetting),
            sw_power_cap: field(ThrottleReason::SwPowerCap),
            hw_slowdown: field(ThrottleReason::HwSlowdown),
            sync_boost: field(ThrottleReason::SyncBoost),
            sw_thermal_slowdown: field(ThrottleReason::SwThermalSlowdown),
            hw_thermal_slowdown: field(ThrottleReason::HwThermalSlowdown),
            hw_power_brake_slowdown: field(ThrottleReason::HwPowerBrakeSlowdown),
            display_clock_setting: field(ThrottleReason::DisplayClockSetting),
            unknown: field(ThrottleReason::Unknown),
        }
    }

    /// State of one reason, `None` for reasons without a report field
    pub fn get(&self, reason: ThrottleReason) -> Option<&MetricResult<bool>> {
        let state = match reason {
            ThrottleReason::GpuIdle => &self.gpu_idle,
            ThrottleReason::UserDefinedClocks => return None,
            ThrottleReason::ApplicationsClocksSetting => &self.applications_clocks_setting,
            ThrottleReason::SwPowerCap => &self.sw_power_cap,
            ThrottleReason::HwSlowdown => &self.hw_slowdown,
            ThrottleReason::SyncBoost => &self.sync_boost,
            ThrottleReason::SwThermalSlowdown => &self.sw_thermal_slowdown,
            ThrottleReason::HwThermalSlowdown => &self.hw_thermal_slowdown,
            ThrottleReason::HwPowerBrakeSlowdown => &self.hw_power_brake_slowdown,
            ThrottleReason::DisplayClockSetting => &self.display_clock_setting,
            ThrottleReason::Unknown => &self.unknown,
        };
        Some(state)
    }

    /// Iterate the reported reasons with their state, in native bit order
    pub fn iter(&self) -> impl Iterator<Item = (ThrottleReason, &MetricResult<bool>)> {
        ThrottleReason::ALL
            .into_iter()
            .filter(ThrottleReason::is_reported)
            .filter_map(move |reason| self.get(reason).map(|state| (reason, state)))
    }
}
