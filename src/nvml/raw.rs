//! Direct NVML symbol lookups
//!
//! A few queries are read straight from the shared library because the
//! high-level wrapper does not expose them in the shape the report needs.
//! The library is opened once, when the provider initializes.

use crate::domain::BridgeChipInfo;
use crate::error::{ProbeError, ProbeResult};
use crate::nvml::classify;

use libloading::{Library, Symbol};
use nvml_wrapper::error::nvml_try;
use nvml_wrapper_sys::bindings::nvmlDevice_t;
use std::os::raw::{c_uchar, c_uint, c_ulonglong};

#[cfg(target_os = "windows")]
const DEFAULT_LIBRARY: &str = "nvml.dll";
#[cfg(not(target_os = "windows"))]
const DEFAULT_LIBRARY: &str = "libnvidia-ml.so.1";

// NVML_MAX_PHYSICAL_BRIDGE
const MAX_PHYSICAL_BRIDGE: usize = 128;

/// nvmlBridgeChipInfo_t
#[repr(C)]
#[derive(Clone, Copy)]
struct RawBridgeChipInfo {
    chip_type: c_uint,
    fw_version: c_uint,
}

/// nvmlBridgeChipHierarchy_t
#[repr(C)]
struct RawBridgeChipHierarchy {
    bridge_count: c_uchar,
    chips: [RawBridgeChipInfo; MAX_PHYSICAL_BRIDGE],
}

type GetBridgeChipInfoFn =
    unsafe extern "C" fn(nvmlDevice_t, *mut RawBridgeChipHierarchy) -> c_uint;

type GetThrottleReasonsFn = unsafe extern "C" fn(nvmlDevice_t, *mut c_ulonglong) -> c_uint;

/// Handle to the NVML shared library for direct symbol calls
pub struct RawNvml {
    lib: Library,
}

impl RawNvml {
    /// Open the NVML shared library
    pub fn load(path: Option<&str>) -> Result<Self, libloading::Error> {
        let path = path.unwrap_or(DEFAULT_LIBRARY);
        // SAFETY: NVML has no library constructors with preconditions; the
        // wrapper has already loaded and initialized the same library.
        let lib = unsafe { Library::new(path) }?;
        Ok(Self { lib })
    }

    /// Read the bridge chip hierarchy of a device
    ///
    /// # Safety
    ///
    /// `handle` must be a live device handle of an initialized NVML session.
    pub unsafe fn bridge_chips(&self, handle: nvmlDevice_t) -> ProbeResult<Vec<BridgeChipInfo>> {
        let func: Symbol<GetBridgeChipInfoFn> = self
            .lib
            .get(b"nvmlDeviceGetBridgeChipInfo")
            .map_err(|_| ProbeError::Unsupported)?;

        let mut hierarchy = RawBridgeChipHierarchy {
            bridge_count: 0,
            chips: [RawBridgeChipInfo {
                chip_type: 0,
                fw_version: 0,
            }; MAX_PHYSICAL_BRIDGE],
        };

        nvml_try(func(handle, &mut hierarchy)).map_err(classify)?;

        let count = (hierarchy.bridge_count as usize).min(MAX_PHYSICAL_BRIDGE);
        Ok(hierarchy.chips[..count]
            .iter()
            .map(|chip| BridgeChipInfo {
                chip_type: chip.chip_type,
                fw_version: chip.fw_version,
            })
            .collect())
    }

    /// Read the full bitmask of throttle reasons the device can report
    ///
    /// # Safety
    ///
    /// `handle` must be a live device handle of an initialized NVML session.
    pub unsafe fn supported_throttle_reasons(&self, handle: nvmlDevice_t) -> ProbeResult<u64> {
        self.throttle_mask(b"nvmlDeviceGetSupportedClocksThrottleReasons", handle)
    }

    /// Read the full bitmask of throttle reasons active right now
    ///
    /// # Safety
    ///
    /// `handle` must be a live device handle of an initialized NVML session.
    pub unsafe fn current_throttle_reasons(&self, handle: nvmlDevice_t) -> ProbeResult<u64> {
        self.throttle_mask(b"nvmlDeviceGetCurrentClocksThrottleReasons", handle)
    }

    unsafe fn throttle_mask(&self, symbol: &[u8], handle: nvmlDevice_t) -> ProbeResult<u64> {
        let func: Symbol<GetThrottleReasonsFn> =
            self.lib.get(symbol).map_err(|_| ProbeError::Unsupported)?;
        read_mask(*func, handle)
    }
}

// The typed wrapper truncates masks to the flags it knows, which drops the
// unknown-reason bit; read the raw value instead.
unsafe fn read_mask(func: GetThrottleReasonsFn, handle: nvmlDevice_t) -> ProbeResult<u64> {
    let mut mask: c_ulonglong = 0;
    nvml_try(func(handle, &mut mask)).map_err(classify)?;
    Ok(mask)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hierarchy_layout_matches_native() {
        // unsigned char + padding + 128 * (2 * unsigned int)
        assert_eq!(
            std::mem::size_of::<RawBridgeChipHierarchy>(),
            4 + MAX_PHYSICAL_BRIDGE * 8
        );
    }

    unsafe extern "C" fn mask_with_unknown(_: nvmlDevice_t, out: *mut c_ulonglong) -> c_uint {
        *out = 0x8000_0000_0000_0001;
        0 // NVML_SUCCESS
    }

    unsafe extern "C" fn mask_not_supported(_: nvmlDevice_t, _: *mut c_ulonglong) -> c_uint {
        3 // NVML_ERROR_NOT_SUPPORTED
    }

    #[test]
    fn test_read_mask_keeps_unknown_bit() {
        let mask = unsafe { read_mask(mask_with_unknown, std::ptr::null_mut()) }.unwrap();
        assert_eq!(mask, 0x8000_0000_0000_0001);
    }

    #[test]
    fn test_read_mask_classifies_failure() {
        let result = unsafe { read_mask(mask_not_supported, std::ptr::null_mut()) };
        assert!(matches!(result, Err(ProbeError::Unsupported)));
    }

    #[test]
    fn test_load_missing_library() {
        assert!(RawNvml::load(Some("/nonexistent/libnvidia-ml.so")).is_err());
    }
}
