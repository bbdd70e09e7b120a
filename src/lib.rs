//! nvprobe - NVML-based GPU telemetry library
//!
//! This library queries NVIDIA's NVML for per-device telemetry and
//! assembles it into snapshots in which every field independently carries
//! either a value or the reason it is missing.
//!
//! # Modules
//!
//! - [`cli`]: Command-line interface definitions and report formatting
//! - [`commands`]: Command handlers
//! - [`config`]: Configuration system
//! - [`domain`]: Snapshot and probe types
//! - [`error`]: Error types
//! - [`nvml`]: NVML abstraction layer
//! - [`services`]: Device registry and snapshot aggregation

pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod error;
pub mod nvml;
pub mod services;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use error::{AppError, Result};
