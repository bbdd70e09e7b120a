//! Device handle registry
//!
//! Enumerates devices once at startup. Each handle resolves its identity
//! when it is created; a device whose name or PCI info cannot be resolved
//! aborts the enumeration. A brand the device does not report is recorded
//! as not supported.

use crate::domain::{Brand, Identity, MetricResult};
use crate::error::{FatalError, ProbeError};
use crate::nvml::{GpuDevice, TelemetryProvider};

/// One enumerated GPU with its cached identity
pub struct DeviceHandle<D> {
    index: u32,
    identity: Identity,
    device: D,
}

impl<D: GpuDevice> DeviceHandle<D> {
    /// Resolve the identity of `device` and wrap it in a handle
    pub fn new(index: u32, device: D) -> Result<Self, FatalError> {
        let name = device
            .name()
            .map_err(|e| FatalError::identity(index, "name", e))?;

        let brand = match device.brand() {
            Ok(code) => MetricResult::Ok(
                Brand::from_code(code).ok_or(FatalError::UnknownBrand { index, code })?,
            ),
            Err(ProbeError::Unsupported) => MetricResult::unsupported(),
            Err(e) => return Err(FatalError::identity(index, "brand", e)),
        };

        let pci = device
            .pci_info()
            .map_err(|e| FatalError::identity(index, "pci_info", e))?;

        log::debug!("GPU {}: {} ({}) at {}", index, name, brand, pci.bus_id);

        Ok(Self {
            index,
            identity: Identity { name, brand, pci },
            device,
        })
    }

    /// Zero-based device index
    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// The underlying device, for issuing probes
    pub fn device(&self) -> &D {
        &self.device
    }
}

/// All devices visible to the provider, in index order
pub struct DeviceRegistry<D> {
    handles: Vec<DeviceHandle<D>>,
}

impl<D: GpuDevice> DeviceRegistry<D> {
    /// Enumerate every device
    ///
    /// A device count of zero yields an empty registry.
    pub fn enumerate<'p, P>(provider: &'p P) -> Result<Self, FatalError>
    where
        P: TelemetryProvider<Device<'p> = D> + 'p,
    {
        let count = provider
            .device_count()
            .map_err(|e| FatalError::provider("device_count", e))?;

        if count == 0 {
            log::info!("No GPUs found");
        }

        let handles = (0..count)
            .map(|index| Self::acquire(provider, index))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { handles })
    }

    /// Enumerate only the device at `index`
    pub fn select<'p, P>(provider: &'p P, index: u32) -> Result<Self, FatalError>
    where
        P: TelemetryProvider<Device<'p> = D> + 'p,
    {
        let count = provider
            .device_count()
            .map_err(|e| FatalError::provider("device_count", e))?;

        if index >= count {
            return Err(FatalError::DeviceNotFound(index));
        }

        Ok(Self {
            handles: vec![Self::acquire(provider, index)?],
        })
    }

    fn acquire<'p, P>(provider: &'p P, index: u32) -> Result<DeviceHandle<D>, FatalError>
    where
        P: TelemetryProvider<Device<'p> = D> + 'p,
    {
        let device = provider
            .device_by_index(index)
            .map_err(|e| FatalError::provider("device_by_index", e))?;
        DeviceHandle::new(index, device)
    }
}

impl<D> DeviceRegistry<D> {
    pub fn handles(&self) -> &[DeviceHandle<D>] {
        &self.handles
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}
