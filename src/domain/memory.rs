//! Memory domain types
//!
//! Framebuffer and BAR1 usage. Byte counts are exact; the MiB strings are
//! each derived from their own byte count.

use crate::domain::metric::{MetricResult, Reading};
use serde::Serialize;

const MIB: u64 = 1024 * 1024;

/// Raw memory counters as reported by the provider, in bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MemoryCounters {
    pub total: u64,
    pub used: u64,
}

impl MemoryCounters {
    /// Create new memory counters
    pub fn new(total: u64, used: u64) -> Self {
        Self { total, used }
    }
}

/// Format a byte count as whole MiB
pub fn format_mib(bytes: u64) -> Reading<u64> {
    Reading::new(bytes, format!("{} MiB", bytes / MIB))
}

/// Total/used/free for one memory region
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemoryUsage {
    pub total: Reading<u64>,
    pub used: Reading<u64>,
    pub free: Reading<u64>,
}

impl From<MemoryCounters> for MemoryUsage {
    fn from(counters: MemoryCounters) -> Self {
        let free = counters.total.saturating_sub(counters.used);
        Self {
            total: format_mib(counters.total),
            used: format_mib(counters.used),
            free: format_mib(free),
        }
    }
}

/// Memory section of a snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemorySnapshot {
    /// Framebuffer memory
    pub main: MetricResult<MemoryUsage>,
    /// BAR1 aperture
    pub bar1: MetricResult<MemoryUsage>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_free_is_exact_difference() {
        let usage = MemoryUsage::from(MemoryCounters::new(8_589_934_592, 1_073_741_824));
        assert_eq!(usage.free.value, 8_589_934_592 - 1_073_741_824);
        assert_eq!(usage.total.text, "8192 MiB");
        assert_eq!(usage.used.text, "1024 MiB");
        assert_eq!(usage.free.text, "7168 MiB");
    }

    #[test]
    fn test_unaligned_bytes_truncate() {
        let usage = MemoryUsage::from(MemoryCounters::new(3 * MIB + 10, MIB + 20));
        assert_eq!(usage.free.value, 2 * MIB - 10);
        assert_eq!(usage.free.text, "1 MiB");
    }

    #[test]
    fn test_used_above_total_does_not_underflow() {
        let usage = MemoryUsage::from(MemoryCounters::new(MIB, 2 * MIB));
        assert_eq!(usage.free.value, 0);
    }
}
