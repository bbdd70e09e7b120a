//! Logger setup for the binary

use env_logger::{Builder, Env};
use log::LevelFilter;

/// Build the stderr logger
///
/// `RUST_LOG` sets the filter, `warn` when unset. `verbose` raises the
/// default level to `debug` so degraded probes are shown.
pub fn logger(verbose: bool) -> Builder {
    let mut builder = Builder::from_env(Env::default().default_filter_or("warn"));
    builder.format_timestamp(None);
    if verbose {
        builder.filter_level(LevelFilter::Debug);
    }
    builder
}

/// Install the logger; call once, after the configuration is merged
pub fn init_logging(verbose: bool) {
    logger(verbose).init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::{Level, Log, Metadata};

    fn enabled(logger: &env_logger::Logger, level: Level) -> bool {
        logger.enabled(
            &Metadata::builder()
                .level(level)
                .target("nvprobe::services::probe")
                .build(),
        )
    }

    #[test]
    fn test_verbose_enables_debug() {
        let logger = logger(true).build();
        assert!(enabled(&logger, Level::Debug));
        assert!(enabled(&logger, Level::Warn));
    }

    #[test]
    fn test_quiet_drops_debug() {
        // RUST_LOG from the test environment would override the default
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        let logger = logger(false).build();
        assert!(!enabled(&logger, Level::Debug));
        assert!(enabled(&logger, Level::Warn));
    }
}
