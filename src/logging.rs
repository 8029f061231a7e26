//! Logging initialization
//!
//! Diagnostics go through `tracing` and are written to stderr so they never
//! mix with command output on stdout. `RUST_LOG` takes precedence over any
//! filter passed in; without either the level is `warn`.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "warn";

/// Install the global subscriber
///
/// Safe to call more than once; later calls are ignored.
pub fn init_logging(filter: Option<&str>) {
    let env_filter = match std::env::var("RUST_LOG") {
        Ok(_) => EnvFilter::from_default_env(),
        Err(_) => EnvFilter::new(filter.unwrap_or(DEFAULT_FILTER)),
    };

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init();
}

/// Filter for a `-v` count, if any
pub fn verbosity_filter(verbose: u8) -> Option<&'static str> {
    match verbose {
        0 => None,
        1 => Some("info"),
        2 => Some("debug"),
        _ => Some("trace"),
    }
}
