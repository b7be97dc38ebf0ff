//! Tracing/logging setup shared by every binary in the workspace.

/// Initialize process-wide observability (tracing/logging).
///
/// `default_level` applies when `RUST_LOG` is unset or unparseable.
/// Safe to call multiple times; subsequent calls become no-ops.
pub fn init(default_level: &str) {
    tracing::init(default_level);
}

/// Tracing configuration (filters, layers).
pub mod tracing;
