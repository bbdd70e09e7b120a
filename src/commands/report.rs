//! Report command implementation
//!
//! Initializes NVML, snapshots every selected GPU and prints the report.

use crate::cli::output::{print_output, DeviceReport, Report};
use crate::commands::provider_query;
use crate::config::Config;
use crate::error::{FatalError, Result};
use crate::nvml::{NvmlProvider, TelemetryProvider};
use crate::services::{DeviceRegistry, SnapshotAggregator};

/// Collect the report from a provider
///
/// Any session-fatal condition aborts the whole report; no partial report
/// is returned.
pub fn build_report<P: TelemetryProvider>(
    provider: &P,
    config: &Config,
) -> std::result::Result<Report, FatalError> {
    let driver_version = provider_query("driver_version", provider.driver_version())?;
    let nvml_version = provider_query("nvml_version", provider.nvml_version())?;

    let registry = match config.gpu.index {
        Some(index) => DeviceRegistry::select(provider, index)?,
        None => DeviceRegistry::enumerate(provider)?,
    };

    let aggregator = SnapshotAggregator::new(config.probe.error_policy);
    let devices = registry
        .handles()
        .iter()
        .map(|handle| -> std::result::Result<DeviceReport, FatalError> {
            Ok(DeviceReport {
                identity: handle.identity().clone(),
                snapshot: aggregator.snapshot(handle)?,
                show_supported_clocks: config.output.show_supported_clocks,
            })
        })
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(Report {
        driver_version,
        nvml_version,
        devices,
    })
}

/// Execute the report command
pub fn run_report(config: &Config) -> Result<()> {
    let provider = NvmlProvider::init(&config.provider)?;
    let report = build_report(&provider, config)?;

    print_output(&report, config.output.format)?;

    provider.shutdown()?;
    Ok(())
}
