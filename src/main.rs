//! nvprobe - NVML-based GPU telemetry reporter
//!
//! A command-line tool that prints clocks, power, temperature, memory,
//! PCIe and utilization for every NVIDIA GPU, marking the metrics a device
//! does not support.

use clap::Parser;
use nvprobe::cli::args::{generate_completions, Cli, Commands, ReportArgs};
use nvprobe::cli::logging::init_logging;
use nvprobe::commands::{run_list, run_report};
use nvprobe::config::{Config, ConfigBuilder};
use nvprobe::error::{AppError, FatalError};

fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Run the appropriate command
    let result = run(&cli);

    if let Err(e) = result {
        log::error!("{}", e);
        print_error(&e);
        std::process::exit(1);
    }
}

fn load_config(cli: &Cli, report: Option<&ReportArgs>) -> Result<Config, AppError> {
    let builder = ConfigBuilder::new().with_file(cli.config.as_deref())?;
    let source = builder.source().map(|path| path.display().to_string());

    let config = builder
        .with_verbose(cli.verbose.then_some(true))
        .with_library_path(cli.library_path.clone())
        .with_error_policy(cli.error_policy)
        .with_gpu_index(cli.gpu)
        .with_format(cli.format)
        .with_supported_clocks(report.and_then(|r| r.supported_clocks.then_some(true)))
        .build();

    // The verbose level is only known once file and CLI are merged
    init_logging(config.general.verbose);
    if let Some(source) = source {
        log::info!("Loaded config from {}", source);
    }
    log::debug!("Configuration: {:?}", config);

    Ok(config)
}

fn run(cli: &Cli) -> Result<(), AppError> {
    match &cli.command {
        None => run_report(&load_config(cli, None)?),

        Some(Commands::Report(args)) => run_report(&load_config(cli, Some(args))?),

        Some(Commands::List) => run_list(&load_config(cli, None)?),

        Some(Commands::Completions { shell }) => {
            generate_completions(*shell);
            Ok(())
        }
    }
}

fn print_error(err: &AppError) {
    eprintln!("Error: {}", err);

    // Print helpful hints for common errors
    match err {
        AppError::Fatal(FatalError::LibraryNotFound) => {
            eprintln!();
            eprintln!("Hint: Make sure the NVIDIA driver is installed.");
            eprintln!("      On Linux, install the nvidia-utils package,");
            eprintln!("      or point --library-path at libnvidia-ml.so.1.");
        }
        AppError::Fatal(FatalError::Native { .. }) => {
            eprintln!();
            eprintln!("Hint: Use --error-policy degrade to report this field as");
            eprintln!("      missing instead of aborting.");
        }
        AppError::Fatal(FatalError::Uninitialized) => {
            eprintln!();
            eprintln!("Hint: NVML was queried before initialization or after shutdown.");
            eprintln!("      This is a bug in nvprobe; please report it with -v output.");
        }
        AppError::Fatal(FatalError::DeviceNotFound(_)) => {
            eprintln!();
            eprintln!("Hint: Run 'nvprobe list' to see the available GPU indices.");
        }
        _ => {}
    }
}
