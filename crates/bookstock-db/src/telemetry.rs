//! # Logging Setup
//!
//! Installs the `tracing` subscriber for binaries built on this crate.
//! Library code only emits events; it never installs a subscriber itself.

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "info,bookstock=debug,sqlx=warn";

/// Installs a formatting subscriber filtered by `RUST_LOG`.
///
/// Calling it again after a subscriber is installed does nothing.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
