//! NVML provider implementation
//!
//! Owns the process-wide NVML session: initialized once at startup, shut
//! down once at exit. Dropping the provider also releases the library, so
//! early returns cannot leak the session.

use crate::config::ProviderConfig;
use crate::error::{FatalError, ProbeResult};
use crate::nvml::classify;
use crate::nvml::device::NvmlDevice;
use crate::nvml::raw::RawNvml;
use crate::nvml::traits::TelemetryProvider;

use nvml_wrapper::Nvml;
use std::ffi::OsStr;

/// NVML session and device discovery
pub struct NvmlProvider {
    nvml: Nvml,
    raw: Option<RawNvml>,
}

impl NvmlProvider {
    /// Initialize NVML
    pub fn init(config: &ProviderConfig) -> Result<Self, FatalError> {
        let nvml = match config.library_path.as_deref() {
            Some(path) => Nvml::builder().lib_path(OsStr::new(path)).init(),
            None => Nvml::init(),
        }
        .map_err(|e| match e {
            nvml_wrapper::error::NvmlError::LibloadingError(_) => FatalError::LibraryNotFound,
            nvml_wrapper::error::NvmlError::DriverNotLoaded => {
                FatalError::InitializationFailed("NVIDIA driver not loaded".to_string())
            }
            other => FatalError::InitializationFailed(other.to_string()),
        })?;

        let raw = match RawNvml::load(config.library_path.as_deref()) {
            Ok(raw) => Some(raw),
            Err(e) => {
                log::warn!("Direct NVML symbol access unavailable: {}", e);
                None
            }
        };

        log::info!("NVML initialized");
        Ok(Self { nvml, raw })
    }

    /// Shut NVML down
    ///
    /// Consumes the provider, so no device can be queried afterwards.
    pub fn shutdown(self) -> Result<(), FatalError> {
        let Self { nvml, raw } = self;
        drop(raw);
        nvml.shutdown()
            .map_err(|e| FatalError::ShutdownFailed(e.to_string()))?;
        log::info!("NVML shut down");
        Ok(())
    }
}

impl TelemetryProvider for NvmlProvider {
    type Device<'a> = NvmlDevice<'a>;

    fn driver_version(&self) -> ProbeResult<String> {
        self.nvml.sys_driver_version().map_err(classify)
    }

    fn nvml_version(&self) -> ProbeResult<String> {
        self.nvml.sys_nvml_version().map_err(classify)
    }

    fn device_count(&self) -> ProbeResult<u32> {
        self.nvml.device_count().map_err(classify)
    }

    fn device_by_index(&self, index: u32) -> ProbeResult<Self::Device<'_>> {
        let device = self.nvml.device_by_index(index).map_err(classify)?;
        Ok(NvmlDevice::new(device, self.raw.as_ref()))
    }
}
