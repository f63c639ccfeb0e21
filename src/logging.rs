// ============================================================================
// Logging
// Optional tracing subscriber setup for binaries, demos and benches
// ============================================================================

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install a stdout subscriber.
///
/// `RUST_LOG` wins over `default_filter` when set. Returns `false` if a
/// global subscriber was already installed.
pub fn init_logging(default_filter: &str) -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .try_init()
        .is_ok()
}
