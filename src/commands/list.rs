//! List command implementation
//!
//! Lists all detected NVIDIA GPUs.

use crate::cli::output::{print_output, GpuList, GpuListEntry};
use crate::commands::provider_query;
use crate::config::Config;
use crate::error::{FatalError, Result};
use crate::nvml::{NvmlProvider, TelemetryProvider};
use crate::services::DeviceRegistry;

/// Enumerate GPU identities without running the probe catalog
pub fn build_list<P: TelemetryProvider>(provider: &P) -> std::result::Result<GpuList, FatalError> {
    let driver_version = provider_query("driver_version", provider.driver_version())?;
    let registry = DeviceRegistry::enumerate(provider)?;

    let gpus = registry
        .handles()
        .iter()
        .map(|handle| GpuListEntry {
            index: handle.index(),
            identity: handle.identity().clone(),
        })
        .collect();

    Ok(GpuList {
        gpus,
        driver_version,
    })
}

/// Execute the list command
pub fn run_list(config: &Config) -> Result<()> {
    let provider = NvmlProvider::init(&config.provider)?;
    let gpu_list = build_list(&provider)?;

    print_output(&gpu_list, config.output.format)?;

    provider.shutdown()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockDevice, MockProvider};

    #[test]
    fn test_list_identities() {
        let provider = MockProvider::with_devices(vec![
            MockDevice::new(0).with_name("NVIDIA A100-SXM4-40GB"),
            MockDevice::new(1).with_brand(5),
        ]);
        let list = build_list(&provider).unwrap();

        assert_eq!(list.gpus.len(), 2);
        assert_eq!(list.gpus[0].identity.short_name(), "A100-SXM4-40GB");
        assert_eq!(list.gpus[1].identity.brand.to_string(), "GeForce");
    }

    #[test]
    fn test_list_skips_probes() {
        // Listing only resolves identity
        let provider = MockProvider::with_devices(vec![MockDevice::new(0)
            .with_failure("temperature", crate::error::ProbeError::Uninitialized)]);
        assert!(build_list(&provider).is_ok());
    }

    #[test]
    fn test_list_unknown_brand() {
        let provider = MockProvider::with_devices(vec![MockDevice::new(0).with_brand(42)]);
        assert!(matches!(
            build_list(&provider),
            Err(FatalError::UnknownBrand { index: 0, code: 42 })
        ));
    }
}
