//! Logging setup shared by the console and the test suites.

/// Initialize process-wide logging from `settings`.
///
/// Safe to call multiple times; subsequent calls are no-ops.
pub fn init(settings: &LogSettings) {
    tracing::init(settings);
}

/// Route log output through the test harness' captured writer.
pub fn init_for_tests() {
    tracing::init_for_tests();
}

/// Subscriber configuration (filter, output format).
pub mod tracing;

pub use self::tracing::LogSettings;
