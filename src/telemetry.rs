//! `tracing` subscriber setup for hosts that embed the library.

use tracing_subscriber::EnvFilter;

/// Install a formatted subscriber honouring `filter` (e.g. `"info"`).
///
/// `RUST_LOG`, when set, wins over `filter`. Calling this again, or after the
/// host installed its own subscriber, is a no-op.
pub fn init(filter: &str) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .try_init();
}
