//! Tracing and logging (shared setup).

/// Initialize process-wide tracing/logging.
///
/// `default_filter` applies when `RUST_LOG` is unset or invalid.
/// Safe to call multiple times; subsequent calls become no-ops.
pub fn init(default_filter: &str) {
    tracing::init(default_filter);
}

/// Tracing configuration (filters, layers).
pub mod tracing;
