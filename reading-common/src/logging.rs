//! Tracing subscriber setup shared by the service binaries

use tracing_subscriber::EnvFilter;

/// Initialize the global fmt subscriber
///
/// `RUST_LOG` takes precedence; otherwise `default_level` (usually the TOML
/// `[logging] level`) is used. Safe to call more than once: later calls are
/// no-ops.
pub fn init(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}
