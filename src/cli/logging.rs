//! Diagnostic logging setup

use tracing_subscriber::EnvFilter;

/// Environment variable holding an explicit log filter
pub const LOG_ENV: &str = "YATA_LOG";

/// Verbosity levels for diagnostic output
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    Quiet = 0,
    Normal = 1,
    Verbose = 2,
}

impl Verbosity {
    /// Default filter directive for this level
    pub fn directive(&self) -> &'static str {
        match self {
            Verbosity::Quiet => "yata=error",
            Verbosity::Normal => "yata=warn",
            Verbosity::Verbose => "yata=debug",
        }
    }
}

/// Install the stderr subscriber; `YATA_LOG` wins over the verbosity flags
pub fn init_logging(verbosity: Verbosity) {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(verbosity.directive()));

    // a subscriber may already be installed
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
