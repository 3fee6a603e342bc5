//! Tracing and logging setup shared by the store's binaries and tests.

/// Initialize process-wide logging with the default configuration.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init(&TracingConfig::default());
}

/// Initialize process-wide logging with an explicit configuration.
pub fn init_with(config: &TracingConfig) {
    tracing::init(config);
}

/// Subscriber configuration (filters, format).
pub mod tracing;

pub use tracing::TracingConfig;
