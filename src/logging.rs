//! Tracing setup for the command-line binary.

use tracing_subscriber::EnvFilter;

/// Initialise the global tracing subscriber.
///
/// `RUST_LOG` takes precedence when set; otherwise the default level is
/// `warn`, raised to `debug` for this crate when `verbose` is requested.
/// Diagnostics go to stderr so report output on stdout stays parseable.
pub fn init(verbose: bool) {
    let default = if verbose { "cssmod=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
