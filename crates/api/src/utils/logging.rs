use std::time::Duration;

use stillmint_domain::Result as DomainResult;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Set to any value to emit JSON log lines instead of the human format.
pub const LOG_JSON_ENV: &str = "STILLMINT_LOG_JSON";

/// Install the global tracing subscriber.
///
/// The filter comes from `RUST_LOG` when set, otherwise from `default_level`
/// (the configured `log_level`). Logs go to stderr so command output on
/// stdout stays clean. A second call leaves the first subscriber in place.
pub fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr);

    let result = if std::env::var_os(LOG_JSON_ENV).is_some() {
        builder.json().with_current_span(false).try_init()
    } else {
        builder.with_target(false).try_init()
    };

    if result.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}

/// Log the outcome of a command execution with structured fields.
///
/// `command` should be a stable identifier such as `"meditate"`.
pub fn log_command_execution<T>(command: &str, elapsed: Duration, result: &DomainResult<T>) {
    let duration_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);

    match result {
        Ok(_) => info!(command, duration_ms, "command_execution_success"),
        Err(err) => warn!(
            command,
            duration_ms,
            error_type = err.label(),
            error = %err,
            "command_execution_failure"
        ),
    }
}
