//! Probe runner
//!
//! Every per-device query goes through [`Prober`], which is the one place a
//! failed query is turned into either a degraded field or a session-fatal
//! error.

use crate::config::ErrorPolicy;
use crate::domain::{DegradedReason, MetricResult};
use crate::error::{FatalError, ProbeError, ProbeResult};

/// Runs fallible probes against one device
#[derive(Debug, Clone, Copy)]
pub struct Prober {
    index: u32,
    policy: ErrorPolicy,
}

impl Prober {
    /// Create a prober for the device at `index`
    pub fn new(index: u32, policy: ErrorPolicy) -> Self {
        Self { index, policy }
    }

    /// Run one probe and record its outcome
    pub fn run<T, F>(&self, name: &str, probe: F) -> Result<MetricResult<T>, FatalError>
    where
        F: FnOnce() -> ProbeResult<T>,
    {
        self.settle(name, probe())
    }

    /// Record the outcome of a query that has already been issued
    pub fn settle<T>(&self, name: &str, result: ProbeResult<T>) -> Result<MetricResult<T>, FatalError> {
        match result {
            Ok(value) => Ok(MetricResult::Ok(value)),
            Err(ProbeError::Unsupported) => {
                self.degraded(name, DegradedReason::Unsupported);
                Ok(MetricResult::unsupported())
            }
            Err(ProbeError::Uninitialized) => {
                log::error!("probe={} device={} reason=uninitialized", name, self.index);
                Err(FatalError::Uninitialized)
            }
            Err(ProbeError::Other(message)) => match self.policy {
                ErrorPolicy::Fatal => {
                    log::error!("probe={} device={} reason={}", name, self.index, message);
                    Err(FatalError::Native {
                        index: self.index,
                        probe: name.to_string(),
                        message,
                    })
                }
                ErrorPolicy::Degrade => {
                    let reason = DegradedReason::Other(message);
                    self.degraded(name, reason.clone());
                    Ok(MetricResult::Degraded(reason))
                }
            },
        }
    }

    fn degraded(&self, name: &str, reason: DegradedReason) {
        log::debug!("probe={} device={} reason={}", name, self.index, reason);
    }
}
