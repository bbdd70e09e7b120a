//! InfoROM versions

use crate::domain::metric::MetricResult;
use serde::Serialize;

/// InfoROM object to query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InfoRomObject {
    Oem,
    Ecc,
    Power,
}

/// InfoROM section of a snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InfoRomVersions {
    pub image: MetricResult<String>,
    pub oem: MetricResult<String>,
    pub ecc: MetricResult<String>,
    pub power: MetricResult<String>,
}
