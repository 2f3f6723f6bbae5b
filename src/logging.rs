//! Tracing subscriber setup for the CLI.
//!
//! `RUST_LOG` wins when set. Otherwise per-header failures (`warn`) are shown,
//! and `--verbose` or `debug = true` in settings lowers the level to `debug`.
//! Output goes to stderr so the script on stdout stays clean.

use tracing_subscriber::EnvFilter;

/// Filter directive used when `RUST_LOG` is not set
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose { "stkbind=debug" } else { "stkbind=warn" }
}

/// Install the global subscriber. Later calls are no-ops.
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive(verbose)))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
