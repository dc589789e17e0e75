//! Diagnostics via `tracing`
//!
//! Configure with the RUST_LOG environment variable:
//! - `RUST_LOG=debug` - cache hits, grammar loads, stale renders
//! - `RUST_LOG=lark_highlight::syntax=info` - grammar installs only
//!
//! Output goes to stderr so stdout carries nothing but markup.

use tracing_subscriber::EnvFilter;

/// Initialize the stderr subscriber, defaulting to `warn`
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    // A subscriber may already be installed when embedded
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init();
}
