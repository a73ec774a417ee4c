//! Development-time tracing for debugging the provisioner.
//!
//! Diagnostics go to stderr via `RUST_LOG`; operator-facing output
//! (status lines, prompts) goes through the `Console` adapter on stdout
//! and is unaffected by this module.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing subscriber for development logging.
///
/// Reads `RUST_LOG`. Defaults to `warn` if unset. Output: stderr,
/// compact format.
///
/// # Example
/// ```bash
/// RUST_LOG=provisioner=debug provisioner run
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
