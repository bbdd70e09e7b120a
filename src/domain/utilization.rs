//! Utilization domain types

use crate::domain::metric::{MetricResult, Reading};
use serde::Serialize;

/// GPU and memory utilization, as read in one native call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UtilizationRates {
    /// GPU compute utilization (0-100%)
    pub gpu: u32,
    /// Memory bandwidth utilization (0-100%)
    pub memory: u32,
}

impl UtilizationRates {
    /// Create a new utilization value
    pub fn new(gpu: u32, memory: u32) -> Self {
        Self { gpu, memory }
    }
}

/// Utilization section of a snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UtilizationSnapshot {
    pub gpu: MetricResult<Reading<u32>>,
    pub memory: MetricResult<Reading<u32>>,
    pub encoder: MetricResult<Reading<u32>>,
    pub decoder: MetricResult<Reading<u32>>,
}
