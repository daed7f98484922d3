//! Tracing/logging setup for processes embedding the analytics engine.
//!
//! The engine crates only *emit* `tracing` events; installing a subscriber
//! is the host process's job. This crate gives embedders a one-call setup.

/// Subscriber configuration (filters, output format).
pub mod tracing;

/// Initialize process-wide logging.
///
/// Safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init();
}
