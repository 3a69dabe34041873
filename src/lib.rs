//! Proxy Checker - Proxy Probe and Finder
//!
//! Checks proxies by routing a test request through each one with bounded
//! concurrency, and gathers fresh candidates from public proxy lists.

pub mod error;
pub mod proxy;
pub mod report;

pub use error::Error;
pub use proxy::*;
pub use report::{Report, Reporter};

use tracing_subscriber::EnvFilter;

/// Application result type
pub type Result<T> = std::result::Result<T, Error>;

/// Install the stderr log subscriber.
///
/// Honors `RUST_LOG` and falls back to `warn` so status lines on stdout stay
/// readable.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
