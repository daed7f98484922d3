//! Subscriber initialization.

use tracing_subscriber::EnvFilter;

/// Install the process-wide subscriber: compact output, level taken from
/// `RUST_LOG` (defaulting to `info` for the engine crates).
///
/// Safe to call multiple times (subsequent calls are no-ops).
pub fn init() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("stocklens=info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .compact()
        .with_target(true)
        .try_init();
}

/// Capture-friendly setup for tests: debug level, test writer, no-op if a
/// subscriber is already installed.
pub fn init_for_tests() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("stocklens=debug"))
        .with_test_writer()
        .try_init();
}
