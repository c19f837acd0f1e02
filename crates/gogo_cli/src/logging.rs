//! Log subscriber setup.

use gogo_config::RunConfig;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable holding an `EnvFilter` directive that overrides the flags.
pub const LOG_ENV: &str = "GOGO_LOG";

/// Picks the default log level from the quiet and verbose flags.
pub fn default_level(config: &RunConfig) -> LevelFilter {
    if config.verbose {
        LevelFilter::DEBUG
    } else if config.quiet {
        LevelFilter::ERROR
    } else {
        LevelFilter::WARN
    }
}

/// Installs the global subscriber writing to stderr.
///
/// Does nothing if a subscriber is already installed.
pub fn init(config: &RunConfig) {
    let filter = EnvFilter::builder()
        .with_default_directive(default_level(config).into())
        .with_env_var(LOG_ENV)
        .from_env_lossy();

    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(config.color)
                .with_level(true)
                .with_target(false),
        )
        .with(filter)
        .try_init();
}
