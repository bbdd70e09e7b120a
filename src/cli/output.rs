//! Output formatting utilities
//!
//! Provides table and JSON output formatting for CLI commands. Degraded
//! fields render their reason text where the value would be.

use crate::cli::args::OutputFormat;
use crate::domain::{ClockSet, DeviceSnapshot, Identity, MetricResult};
use serde::Serialize;
use std::fmt::{Display, Write as _};
use std::io::{self, Write};

/// Format and print output based on the selected format
pub fn print_output<T: Serialize + TableDisplay>(
    data: &T,
    format: OutputFormat,
) -> crate::error::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();

    match format {
        OutputFormat::Table => {
            writeln!(handle, "{}", data.to_table())?;
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(data)?;
            writeln!(handle, "{}", json)?;
        }
        OutputFormat::Compact => {
            writeln!(handle, "{}", data.to_compact())?;
        }
    }

    Ok(())
}

/// Trait for types that can be displayed as a table
pub trait TableDisplay {
    /// Format as a table string
    fn to_table(&self) -> String;

    /// Format as a compact single line
    fn to_compact(&self) -> String {
        self.to_table().replace('\n', " | ")
    }
}

fn field(out: &mut String, indent: usize, label: &str, value: impl Display) {
    let _ = writeln!(out, "{:indent$}{:<28}: {}", "", label, value, indent = indent);
}

fn section(out: &mut String, indent: usize, title: &str) {
    let _ = writeln!(out, "{:indent$}{}", "", title, indent = indent);
}

fn yes_no(flag: &MetricResult<bool>) -> String {
    flag.as_ref()
        .map(|&b| if b { "Yes" } else { "No" })
        .to_string()
}

fn clock_set(out: &mut String, title: &str, set: &ClockSet) {
    section(out, 4, title);
    field(out, 6, "Current", &set.current);
    field(out, 6, "Max", &set.max);
    field(out, 6, "Applications", &set.applications);
    field(out, 6, "Default Applications", &set.default_applications);
}

/// One GPU: identity plus its snapshot
#[derive(Debug, Clone, Serialize)]
pub struct DeviceReport {
    pub identity: Identity,
    pub snapshot: DeviceSnapshot,
    #[serde(skip)]
    pub show_supported_clocks: bool,
}

impl TableDisplay for DeviceReport {
    fn to_table(&self) -> String {
        let id = &self.identity;
        let s = &self.snapshot;
        let mut out = format!("[{}] {} ({})\n", s.index, id.name, id.brand);

        field(&mut out, 2, "Bus Id", id.bus_id());
        field(
            &mut out,
            2,
            "PCI Device/Subsystem Id",
            format!("{:08X} / {:08X}", id.pci.pci_device_id, id.pci.pci_sub_system_id),
        );
        field(&mut out, 2, "Serial Number", &s.serial);
        field(&mut out, 2, "UUID", &s.uuid);
        field(&mut out, 2, "Minor Number", &s.minor_number);
        field(&mut out, 2, "VBIOS Version", &s.vbios_version);
        field(&mut out, 2, "Board Id", &s.board_id);
        field(&mut out, 2, "Multi-GPU Board", yes_no(&s.multi_gpu_board));

        let m = &s.modes;
        section(&mut out, 2, "Modes");
        field(&mut out, 4, "Display Mode", &m.display_mode);
        field(&mut out, 4, "Display Active", &m.display_active);
        field(&mut out, 4, "Persistence Mode", &m.persistence_mode);
        field(&mut out, 4, "Accounting Mode", &m.accounting_mode);
        field(&mut out, 4, "Accounting Buffer Size", &m.accounting_buffer_size);
        field(&mut out, 4, "Driver Model (Current)", &m.driver_model_current);
        field(&mut out, 4, "Driver Model (Pending)", &m.driver_model_pending);
        field(&mut out, 4, "GPU Operation Mode (Current)", &m.gpu_operation_mode_current);
        field(&mut out, 4, "GPU Operation Mode (Pending)", &m.gpu_operation_mode_pending);
        field(&mut out, 4, "Compute Mode", &m.compute_mode);

        section(&mut out, 2, "InfoROM Version");
        field(&mut out, 4, "Image Version", &s.inforom.image);
        field(&mut out, 4, "OEM Object", &s.inforom.oem);
        field(&mut out, 4, "ECC Object", &s.inforom.ecc);
        field(&mut out, 4, "Power Management Object", &s.inforom.power);

        let c = &s.clocks;
        section(&mut out, 2, "Clocks");
        clock_set(&mut out, "Graphics", &c.graphics);
        clock_set(&mut out, "SM", &c.sm);
        clock_set(&mut out, "Memory", &c.memory);
        field(&mut out, 4, "Auto Boost", &c.auto_boost);
        field(&mut out, 4, "Auto Boost Default", &c.auto_boost_default);

        if self.show_supported_clocks {
            section(&mut out, 4, "Supported Clocks");
            match &c.supported {
                MetricResult::Ok(table) => {
                    for entry in table {
                        let graphics = entry.graphics_mhz.as_ref().map(|list| {
                            list.iter()
                                .map(|mhz| format!("{} MHz", mhz))
                                .collect::<Vec<_>>()
                                .join(", ")
                        });
                        field(&mut out, 6, &format!("Memory {} MHz", entry.memory_mhz), graphics);
                    }
                }
                MetricResult::Degraded(reason) => {
                    let _ = writeln!(out, "{:6}{}", "", reason);
                }
            }
        }

        let p = &s.power;
        section(&mut out, 2, "Power");
        field(&mut out, 4, "Performance State", &p.performance_state);
        field(&mut out, 4, "Power Management", &p.management_mode);
        field(&mut out, 4, "Power Draw", &p.draw);
        field(&mut out, 4, "Power Limit", &p.limit);
        field(&mut out, 4, "Default Power Limit", &p.default_limit);
        field(&mut out, 4, "Enforced Power Limit", &p.enforced_limit);
        field(&mut out, 4, "Min Power Limit", &p.min_limit);
        field(&mut out, 4, "Max Power Limit", &p.max_limit);

        let t = &s.thermal;
        section(&mut out, 2, "Temperature");
        field(&mut out, 4, "GPU Current Temp", &t.current);
        field(&mut out, 4, "GPU Shutdown Temp", &t.shutdown_threshold);
        field(&mut out, 4, "GPU Slowdown Temp", &t.slowdown_threshold);
        field(&mut out, 4, "Fan Speed", &t.fan_speed);

        section(&mut out, 2, "FB Memory Usage");
        match &s.memory.main {
            MetricResult::Ok(usage) => {
                field(&mut out, 4, "Total", &usage.total);
                field(&mut out, 4, "Used", &usage.used);
                field(&mut out, 4, "Free", &usage.free);
            }
            MetricResult::Degraded(reason) => field(&mut out, 4, "Total/Used/Free", reason),
        }
        section(&mut out, 2, "BAR1 Memory Usage");
        match &s.memory.bar1 {
            MetricResult::Ok(usage) => {
                field(&mut out, 4, "Total", &usage.total);
                field(&mut out, 4, "Used", &usage.used);
                field(&mut out, 4, "Free", &usage.free);
            }
            MetricResult::Degraded(reason) => field(&mut out, 4, "Total/Used/Free", reason),
        }

        let u = &s.utilization;
        section(&mut out, 2, "Utilization");
        field(&mut out, 4, "GPU", &u.gpu);
        field(&mut out, 4, "Memory", &u.memory);
        field(&mut out, 4, "Encoder", &u.encoder);
        field(&mut out, 4, "Decoder", &u.decoder);

        let pcie = &s.pcie;
        section(&mut out, 2, "PCIe");
        field(&mut out, 4, "Link Generation (Current)", &pcie.current_link_gen);
        field(&mut out, 4, "Link Generation (Max)", &pcie.max_link_gen);
        field(&mut out, 4, "Link Width (Current)", &pcie.current_link_width);
        field(&mut out, 4, "Link Width (Max)", &pcie.max_link_width);
        field(&mut out, 4, "Tx Throughput", &pcie.tx_throughput);
        field(&mut out, 4, "Rx Throughput", &pcie.rx_throughput);
        field(&mut out, 4, "Replay Counter", &pcie.replay_counter);
        match &pcie.bridge_chip {
            MetricResult::Ok(chip) => {
                field(&mut out, 4, "Bridge Chip Type", &chip.chip_type);
                field(&mut out, 4, "Bridge Chip Firmware", &chip.firmware);
            }
            MetricResult::Degraded(reason) => field(&mut out, 4, "Bridge Chip", reason),
        }

        section(&mut out, 2, "Clocks Throttle Reasons");
        for (reason, state) in s.throttle_reasons.iter() {
            let label = reason
                .name()
                .trim_start_matches("clocks_throttle_reason_")
                .replace('_', " ");
            let state = state
                .as_ref()
                .map(|&active| if active { "Active" } else { "Not Active" });
            field(&mut out, 4, &label, state);
        }

        out
    }

    fn to_compact(&self) -> String {
        let s = &self.snapshot;
        format!(
            "{}:{} temp={} power={} gpu={} mem={}",
            s.index,
            self.identity.short_name(),
            s.thermal.current,
            s.power.draw,
            s.utilization.gpu,
            s.memory
                .main
                .as_ref()
                .map(|usage| format!("{}/{}", usage.used, usage.total)),
        )
    }
}

/// Full report for all selected GPUs
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub driver_version: MetricResult<String>,
    pub nvml_version: MetricResult<String>,
    pub devices: Vec<DeviceReport>,
}

impl TableDisplay for Report {
    fn to_table(&self) -> String {
        let mut output = format!("Driver Version: {}\n", self.driver_version);
        output.push_str(&format!("NVML Version: {}\n", self.nvml_version));
        output.push_str(&format!("Attached GPUs: {}\n", self.devices.len()));

        for device in &self.devices {
            output.push('\n');
            output.push_str(&device.to_table());
        }

        output
    }

    fn to_compact(&self) -> String {
        self.devices
            .iter()
            .map(|d| d.to_compact())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// GPU list entry for display
#[derive(Debug, Clone, Serialize)]
pub struct GpuListEntry {
    pub index: u32,
    #[serde(flatten)]
    pub identity: Identity,
}

impl TableDisplay for GpuListEntry {
    fn to_table(&self) -> String {
        format!(
            "[{}] {} ({}, Bus: {})",
            self.index,
            self.identity.name,
            self.identity.brand,
            self.identity.bus_id()
        )
    }

    fn to_compact(&self) -> String {
        format!("{}:{}", self.index, self.identity.short_name())
    }
}

/// GPU list for display
#[derive(Debug, Clone, Serialize)]
pub struct GpuList {
    pub gpus: Vec<GpuListEntry>,
    pub driver_version: MetricResult<String>,
}

impl TableDisplay for GpuList {
    fn to_table(&self) -> String {
        let mut output = format!("Driver Version: {}\n", self.driver_version);
        output.push_str(&format!("GPUs Found: {}\n\n", self.gpus.len()));

        for gpu in &self.gpus {
            output.push_str(&gpu.to_table());
            output.push('\n');
        }

        output
    }

    fn to_compact(&self) -> String {
        self.gpus
            .iter()
            .map(|g| g.to_compact())
            .collect::<Vec<_>>()
            .join(", ")
    }
}
