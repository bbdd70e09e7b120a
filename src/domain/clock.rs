//! Clock domain types
//!
//! Types for GPU clock readings and the supported clock table.

use crate::domain::metric::{MetricResult, Reading};
use serde::Serialize;

/// Clock domain to query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClockDomain {
    /// Graphics clock
    Graphics,
    /// Streaming Multiprocessor clock
    Sm,
    /// Memory clock
    Memory,
}

/// Which flavour of a clock to query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClockKind {
    /// Clock the device runs at right now
    Current,
    /// Maximum the device can run at
    Max,
    /// Applications clock target
    Applications,
    /// Default applications clock target
    DefaultApplications,
}

/// Auto boost state, as read in one native call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AutoBoostState {
    pub enabled: bool,
    pub default_enabled: bool,
}

/// Format a clock rate the way the report shows it
pub fn format_mhz(mhz: u32) -> Reading<u32> {
    Reading::new(mhz, format!("{} MHz", mhz))
}

/// All variants of one clock domain
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClockSet {
    pub current: MetricResult<Reading<u32>>,
    pub max: MetricResult<Reading<u32>>,
    pub applications: MetricResult<Reading<u32>>,
    pub default_applications: MetricResult<Reading<u32>>,
}

/// One memory clock and the graphics clocks it can be paired with
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SupportedClocks {
    /// Memory clock in MHz
    pub memory_mhz: u32,
    /// Compatible graphics clocks in MHz; degrades per entry
    pub graphics_mhz: MetricResult<Vec<u32>>,
}

/// Clock section of a snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClockSnapshot {
    pub graphics: ClockSet,
    pub sm: ClockSet,
    pub memory: ClockSet,
    /// Whether auto boost is on right now
    pub auto_boost: MetricResult<Reading<bool>>,
    /// Whether auto boost is on by default
    pub auto_boost_default: MetricResult<Reading<bool>>,
    pub supported: MetricResult<Vec<SupportedClocks>>,
}

/// Render an auto boost flag as `On`/`Off`
pub fn format_on_off(enabled: bool) -> Reading<bool> {
    Reading::new(enabled, if enabled { "On" } else { "Off" })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_mhz() {
        let r = format_mhz(1755);
        assert_eq!(r.value, 1755);
        assert_eq!(r.text, "1755 MHz");
    }

    #[test]
    fn test_on_off() {
        assert_eq!(format_on_off(true).text, "On");
        assert_eq!(format_on_off(false).text, "Off");
    }
}
