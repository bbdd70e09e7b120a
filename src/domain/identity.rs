//! Device identity
//!
//! Attributes resolved once when a device handle is acquired. They cannot
//! change without a process restart.

use crate::domain::metric::MetricResult;
use serde::Serialize;
use std::fmt;

/// Product brand reported by the driver
///
/// Covers every documented native brand code. Codes outside this table are
/// rejected at enumeration time instead of being mapped to `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Brand {
    Unknown,
    Quadro,
    Tesla,
    Nvs,
    Grid,
    GeForce,
    Titan,
    NvidiaVapps,
    NvidiaVpc,
    NvidiaVcs,
    NvidiaVws,
    NvidiaCloudGaming,
    QuadroRtx,
    NvidiaRtx,
    Nvidia,
    GeForceRtx,
    TitanRtx,
}

impl Brand {
    /// Look up a native brand code
    pub fn from_code(code: u32) -> Option<Self> {
        let brand = match code {
            0 => Self::Unknown,
            1 => Self::Quadro,
            2 => Self::Tesla,
            3 => Self::Nvs,
            4 => Self::Grid,
            5 => Self::GeForce,
            6 => Self::Titan,
            7 => Self::NvidiaVapps,
            8 => Self::NvidiaVpc,
            9 => Self::NvidiaVcs,
            10 => Self::NvidiaVws,
            11 => Self::NvidiaCloudGaming,
            12 => Self::QuadroRtx,
            13 => Self::NvidiaRtx,
            14 => Self::Nvidia,
            15 => Self::GeForceRtx,
            16 => Self::TitanRtx,
            _ => return None,
        };
        Some(brand)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "Unknown",
            Self::Quadro => "Quadro",
            Self::Tesla => "Tesla",
            Self::Nvs => "NVS",
            Self::Grid => "Grid",
            Self::GeForce => "GeForce",
            Self::Titan => "Titan",
            Self::NvidiaVapps => "NVIDIA Virtual Applications",
            Self::NvidiaVpc => "NVIDIA Virtual PC",
            Self::NvidiaVcs => "NVIDIA Virtual Compute Server",
            Self::NvidiaVws => "NVIDIA RTX Virtual Workstation",
            Self::NvidiaCloudGaming => "NVIDIA Cloud Gaming",
            Self::QuadroRtx => "Quadro RTX",
            Self::NvidiaRtx => "NVIDIA RTX",
            Self::Nvidia => "NVIDIA",
            Self::GeForceRtx => "GeForce RTX",
            Self::TitanRtx => "Titan RTX",
        }
    }
}

impl fmt::Display for Brand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// PCI location of a device as reported by the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PciInfo {
    pub domain: u32,
    pub bus: u32,
    pub device: u32,
    /// Combined vendor/device id
    pub pci_device_id: u32,
    pub pci_sub_system_id: u32,
    /// Bus id string, e.g. `00000000:01:00.0`
    pub bus_id: String,
}

/// Immutable identity of one GPU
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    pub name: String,
    /// Not every board reports a brand
    pub brand: MetricResult<Brand>,
    pub pci: PciInfo,
}

impl Identity {
    pub fn bus_id(&self) -> &str {
        &self.pci.bus_id
    }

    /// Get a short display name
    pub fn short_name(&self) -> &str {
        self.name.strip_prefix("NVIDIA ").unwrap_or(&self.name)
    }
}
