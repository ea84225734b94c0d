//! Logging utilities for gplot.
//!
//! Structured `tracing` helpers shared by the library and the binary.

use std::time::Instant;
use tracing::{debug, error, info};

use crate::error::GplotError;

/// Initialize the tracing subscriber with the given log level.
///
/// `RUST_LOG` takes precedence over `log_level` when it is set.
pub fn init_tracing(log_level: &str) {
    let filter = match std::env::var("RUST_LOG") {
        Ok(val) => val,
        Err(_) => log_level.to_string(),
    };

    // a second init (e.g. from tests) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Log an operation with timing and result in a single statement
pub fn log_timed_operation<F, R>(operation: &str, f: F) -> R
where
    F: FnOnce() -> R,
{
    let start = Instant::now();
    debug!(operation = operation, "Starting operation");

    let result = f();

    info!(
        operation = operation,
        duration_ms = start.elapsed().as_secs_f64() * 1000.0,
        "Operation completed"
    );
    result
}

/// Log summary statistics of a loaded field
pub fn log_field_stats(source: &str, var: &str, shape: &[usize], missing: usize) {
    info!(
        operation = "data_load",
        source = source,
        var = var,
        shape = ?shape,
        missing = missing,
        "Field loaded"
    );
}

/// Log an error with context
pub fn log_error(error: &GplotError, context: &str) {
    error!(
        error = %error,
        context = context,
        error_type = std::any::type_name_of_val(error),
        "Error occurred"
    );
}
