//! Command handlers
//!
//! Each command handler orchestrates the execution of a CLI command.

pub mod list;
pub mod report;

pub use list::{build_list, run_list};
pub use report::{build_report, run_report};

use crate::domain::MetricResult;
use crate::error::{FatalError, ProbeError, ProbeResult};

/// Record a provider-level query the way a device probe would be recorded
///
/// Only "not supported" is tolerated; any other failure ends the session.
fn provider_query<T>(query: &'static str, result: ProbeResult<T>) -> Result<MetricResult<T>, FatalError> {
    match result {
        Ok(value) => Ok(MetricResult::Ok(value)),
        Err(ProbeError::Unsupported) => Ok(MetricResult::unsupported()),
        Err(e) => Err(FatalError::provider(query, e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_query() {
        assert_eq!(
            provider_query("driver_version", Ok("535.154.05")).unwrap(),
            MetricResult::Ok("535.154.05")
        );
        assert_eq!(
            provider_query::<String>("driver_version", Err(ProbeError::Unsupported)).unwrap(),
            MetricResult::unsupported()
        );
        assert_eq!(
            provider_query::<String>("driver_version", Err(ProbeError::Uninitialized)),
            Err(FatalError::Uninitialized)
        );
    }
}
