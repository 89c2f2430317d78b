//! # Logging
//!
//! Initialises the `tracing` subscriber. `RUST_LOG` takes precedence over the
//! configured level. Logs go to stderr so command output on stdout stays clean.

use crate::config::ReconcilerConfig;
use tracing_subscriber::EnvFilter;

/// Build the filter from `RUST_LOG`, falling back to the configured level
#[must_use]
pub fn env_filter(config: &ReconcilerConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "target_group_registration={level},tgrctl={level}",
            level = config.log_level.to_lowercase()
        ))
    })
}

/// Install the global subscriber
///
/// Calling this more than once keeps the first subscriber.
pub fn init_logging(config: &ReconcilerConfig) {
    let filter = env_filter(config);

    let result = if config.log_format.eq_ignore_ascii_case("json") {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_current_span(true)
            .try_init()
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_ansi(config.log_enable_color)
            .try_init()
    };

    if let Err(e) = result {
        tracing::debug!("Tracing subscriber already installed: {e}");
    }
}
