//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

/// Installs the global fmt subscriber.
///
/// The filter comes from `RUST_LOG` when set and defaults to `info`
/// otherwise.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
