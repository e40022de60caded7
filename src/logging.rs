//! Diagnostic logging for the CLI.
//!
//! Library code only emits `tracing` events; the binary installs the
//! subscriber. Output goes to stderr so stdout stays machine-readable.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter when `RUST_LOG` is unset
pub const DEFAULT_FILTER: &str = "warn";

/// Initialize the tracing subscriber.
///
/// Reads `RUST_LOG`; `verbose` raises the fallback to `debug`.
///
/// # Example
/// ```bash
/// RUST_LOG=suitekit=trace suitekit resolve /@fs/home/proj/a.ts
/// ```
pub fn init(verbose: bool) {
    let fallback = if verbose { "debug" } else { DEFAULT_FILTER };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    // A second init (e.g. from tests) keeps the first subscriber
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .try_init();
}
