//! Thermal domain types

use crate::domain::metric::{MetricResult, Reading};
use serde::Serialize;

/// Temperature threshold to query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThresholdKind {
    /// Temperature at which the GPU shuts down
    Shutdown,
    /// Temperature at which the GPU starts to throttle
    Slowdown,
}

/// Format a temperature in Celsius
pub fn format_celsius(celsius: u32) -> Reading<u32> {
    Reading::new(celsius, format!("{} C", celsius))
}

/// Format a percentage
pub fn format_percent(percent: u32) -> Reading<u32> {
    Reading::new(percent, format!("{} %", percent))
}

/// Thermal section of a snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThermalSnapshot {
    /// Current GPU core temperature
    pub current: MetricResult<Reading<u32>>,
    pub shutdown_threshold: MetricResult<Reading<u32>>,
    pub slowdown_threshold: MetricResult<Reading<u32>>,
    /// Speed of the first fan as percentage of its maximum
    pub fan_speed: MetricResult<Reading<u32>>,
}
