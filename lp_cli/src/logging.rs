//! Structured logging configuration.
//!
//! Library code logs through the `log` facade; the subscriber installed here
//! picks those records up alongside its own `tracing` events.

use std::time::Duration;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize structured logging
///
/// Output goes to stderr so command output on stdout stays machine readable.
/// Levels are configurable via the `RUST_LOG` env var (default: `warn,sqlx=warn`,
/// or `info,sqlx=warn` with `verbose`).
pub fn init(verbose: bool) {
    let default_filter = if verbose { "info,sqlx=warn" } else { "warn,sqlx=warn" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}

/// Log one executed command with its duration
///
/// # Arguments
///
/// * `command` - Subcommand name
/// * `league_id` - League the command addressed, if any
/// * `duration` - Wall time of the command
/// * `succeeded` - Whether the command completed
pub fn log_operation(
    command: &str,
    league_id: Option<&str>,
    duration: Duration,
    succeeded: bool,
) {
    let duration_ms = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);

    if !succeeded {
        tracing::warn!(
            command = command,
            league_id = league_id,
            duration_ms = duration_ms,
            "Command refused or failed"
        );
    } else if duration_ms > 1000 {
        tracing::warn!(
            command = command,
            league_id = league_id,
            duration_ms = duration_ms,
            "PERFORMANCE: Slow command"
        );
    } else {
        tracing::info!(
            command = command,
            league_id = league_id,
            duration_ms = duration_ms,
            "Command completed"
        );
    }
}
