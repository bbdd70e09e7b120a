//! Per-field probe outcomes
//!
//! Every telemetry field in a snapshot is a [`MetricResult`]: either the
//! value read from the device or an explicit marker explaining why there is
//! no value. Fields are never silently omitted.

use crate::error::ProbeError;
use serde::{Serialize, Serializer};
use std::fmt;

/// Why a probe did not produce a usable value
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DegradedReason {
    /// The device/driver does not expose this metric
    Unsupported,
    /// The provider was not initialized
    Uninitialized,
    /// Native error message
    Other(String),
}

impl fmt::Display for DegradedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unsupported => write!(f, "Not Supported"),
            Self::Uninitialized => write!(f, "Uninitialized"),
            Self::Other(message) => write!(f, "{}", message),
        }
    }
}

impl Serialize for DegradedReason {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl From<ProbeError> for DegradedReason {
    fn from(err: ProbeError) -> Self {
        match err {
            ProbeError::Unsupported => Self::Unsupported,
            ProbeError::Uninitialized => Self::Uninitialized,
            ProbeError::Other(message) => Self::Other(message),
        }
    }
}

/// Outcome of a single probe as recorded in a snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricResult<T> {
    /// The probe produced a value
    Ok(T),
    /// The probe did not produce a value
    Degraded(DegradedReason),
}

impl<T> MetricResult<T> {
    /// Shorthand for `Degraded(Unsupported)`
    pub fn unsupported() -> Self {
        Self::Degraded(DegradedReason::Unsupported)
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok(_))
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded(_))
    }

    /// The value, if the probe succeeded
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Ok(value) => Some(value),
            Self::Degraded(_) => None,
        }
    }

    /// The reason, if the probe degraded
    pub fn reason(&self) -> Option<&DegradedReason> {
        match self {
            Self::Ok(_) => None,
            Self::Degraded(reason) => Some(reason),
        }
    }

    pub fn as_ref(&self) -> MetricResult<&T> {
        match self {
            Self::Ok(value) => MetricResult::Ok(value),
            Self::Degraded(reason) => MetricResult::Degraded(reason.clone()),
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> MetricResult<U> {
        match self {
            Self::Ok(value) => MetricResult::Ok(f(value)),
            Self::Degraded(reason) => MetricResult::Degraded(reason),
        }
    }

    /// Chain a derived computation that may itself degrade
    pub fn and_then<U, F: FnOnce(T) -> MetricResult<U>>(self, f: F) -> MetricResult<U> {
        match self {
            Self::Ok(value) => f(value),
            Self::Degraded(reason) => MetricResult::Degraded(reason),
        }
    }
}

impl<A, B> MetricResult<(A, B)> {
    /// Split a two-valued read into two fields sharing the same outcome
    pub fn split(self) -> (MetricResult<A>, MetricResult<B>) {
        match self {
            Self::Ok((a, b)) => (MetricResult::Ok(a), MetricResult::Ok(b)),
            Self::Degraded(reason) => (
                MetricResult::Degraded(reason.clone()),
                MetricResult::Degraded(reason),
            ),
        }
    }
}

impl<T: fmt::Display> fmt::Display for MetricResult<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ok(value) => value.fmt(f),
            Self::Degraded(reason) => reason.fmt(f),
        }
    }
}

/// A raw reading paired with its human-readable rendering
///
/// Both halves are built from the same native read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reading<T> {
    pub value: T,
    pub text: String,
}

impl<T> Reading<T> {
    pub fn new(value: T, text: impl Into<String>) -> Self {
        Self {
            value,
            text: text.into(),
        }
    }
}

impl<T> fmt::Display for Reading<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Render a boolean mode as `Enabled`/`Disabled`
pub fn format_enabled(enabled: bool) -> Reading<bool> {
    Reading::new(enabled, if enabled { "Enabled" } else { "Disabled" })
}
