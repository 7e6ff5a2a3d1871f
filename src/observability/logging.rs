//! Structured logging.
//!
//! Uses `tracing` with a compact stderr formatter so stdout stays free for
//! JSON results. `RUST_LOG` takes precedence over the configured level.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Build the filter: `RUST_LOG` if set, else `wave_client=<level>`.
pub fn filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("wave_client={default_level},wave_cli={default_level},warn")))
}

/// Install the global subscriber. Later calls are ignored.
pub fn init(default_level: &str) {
    let _ = tracing_subscriber::registry()
        .with(filter(default_level))
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .try_init();
}
