//! Service layer for telemetry collection
//!
//! Services encapsulate device enumeration, probe execution and snapshot
//! assembly.

pub mod probe;
pub mod registry;
pub mod snapshot;

pub use probe::Prober;
pub use registry::{DeviceHandle, DeviceRegistry};
pub use snapshot::SnapshotAggregator;
