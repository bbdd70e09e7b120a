//! CLI argument definitions using clap derive
//!
//! Defines all command-line arguments and subcommands.

use crate::config::ErrorPolicy;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use serde::{Deserialize, Serialize};

/// NVML-based GPU telemetry reporter
///
/// Print a per-device report of clocks, power, temperature, memory, PCIe
/// and utilization. Metrics a device does not support are marked, not
/// omitted.
#[derive(Parser, Debug)]
#[command(name = "nvprobe")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format [default: table]
    #[arg(long, global = true, value_enum)]
    pub format: Option<OutputFormat>,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "NVPROBE_CONFIG")]
    pub config: Option<String>,

    /// Target GPU by index (0-based)
    #[arg(long, global = true)]
    pub gpu: Option<u32>,

    /// How to handle unclassified NVML errors [default: fatal]
    #[arg(long, global = true, value_enum)]
    pub error_policy: Option<ErrorPolicy>,

    /// Explicit path to the NVML shared library
    #[arg(long, global = true)]
    pub library_path: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the full telemetry report (default)
    Report(ReportArgs),

    /// List all detected GPUs
    List,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Arguments for the report command
#[derive(Parser, Debug, Default)]
pub struct ReportArgs {
    /// List supported memory/graphics clock pairs in table output
    #[arg(long)]
    pub supported_clocks: bool,
}

/// Output format
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format for machine parsing
    Json,
    /// Compact single-line format
    Compact,
}

/// Generate shell completions and print to stdout
pub fn generate_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
}
