//! Logging initialization.
//!
//! The library itself only emits `tracing` events; binaries opt into output
//! by installing a subscriber, normally via [`init`]. Filtering follows the
//! standard `RUST_LOG` conventions.

use tracing_subscriber::EnvFilter;

/// Install the global log subscriber, honoring `RUST_LOG`.
///
/// Falls back to `info` when `RUST_LOG` is unset. Safe to call more than
/// once; subsequent calls are no-ops.
pub fn init() {
    init_with_default("info");
}

/// Install the global log subscriber with an explicit default filter.
pub fn init_with_default(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
