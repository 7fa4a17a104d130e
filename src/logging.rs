//! Logging utilities for journal-e2e
//!
//! Re-exports tracing macros with log_* naming convention for consistency.
//! Diagnostics go to stderr through the subscriber installed by [`init`];
//! the console report on stdout is written independently of `RUST_LOG`.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// Re-export tracing macros with log_* naming
#[allow(unused_imports)]
pub use tracing::{
    debug as log_debug,
    error as log_error,
    info as log_info,
    trace as log_trace,
    warn as log_warn,
};

/// Install the diagnostic subscriber.
///
/// Reads `RUST_LOG`, defaulting to `warn`. Calling it twice is a no-op.
///
/// ```bash
/// RUST_LOG=journal_e2e=debug journal-e2e --mode backend-only
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .try_init();
}
