//! Power domain types
//!
//! Power readings are carried in milliwatts and rendered in watts.

use crate::domain::metric::{MetricResult, Reading};
use serde::Serialize;

/// Min/max power management limits in milliwatts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PowerConstraints {
    pub min_limit: u32,
    pub max_limit: u32,
}

impl PowerConstraints {
    /// Create new power constraints
    pub fn new(min_limit: u32, max_limit: u32) -> Self {
        Self {
            min_limit,
            max_limit,
        }
    }
}

/// Format a milliwatt value as `"123.45 W"`
pub fn format_watts(milliwatts: u32) -> Reading<u32> {
    Reading::new(milliwatts, format!("{:.2} W", milliwatts as f64 / 1000.0))
}

/// Format a performance state as `"P2"`
pub fn format_pstate(state: u32) -> Reading<u32> {
    Reading::new(state, format!("P{}", state))
}

/// Power section of a snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PowerSnapshot {
    /// Current board power draw
    pub draw: MetricResult<Reading<u32>>,
    /// Whether power management is active
    pub management_mode: MetricResult<Reading<bool>>,
    /// Configured power management limit
    pub limit: MetricResult<Reading<u32>>,
    pub default_limit: MetricResult<Reading<u32>>,
    pub enforced_limit: MetricResult<Reading<u32>>,
    pub min_limit: MetricResult<Reading<u32>>,
    pub max_limit: MetricResult<Reading<u32>>,
    /// Performance state (P-state)
    pub performance_state: MetricResult<Reading<u32>>,
}

/// Render the power management mode
pub fn format_management_mode(active: bool) -> Reading<bool> {
    Reading::new(active, if active { "Supported" } else { "N/A" })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_watts() {
        assert_eq!(format_watts(250_000).text, "250.00 W");
        assert_eq!(format_watts(35_123).text, "35.12 W");
        assert_eq!(format_watts(35_123).value, 35_123);
    }

    #[test]
    fn test_format_pstate() {
        assert_eq!(format_pstate(0).text, "P0");
        assert_eq!(format_pstate(8).text, "P8");
    }
}
