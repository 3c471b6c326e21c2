//! Logging setup for the binary.
//!
//! Library code emits `tracing` events; this installs the stderr subscriber.
//! `RUST_LOG` overrides the level picked from `verbose`.

use tracing_subscriber::EnvFilter;

pub fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "dirsnap=debug"
    } else {
        "dirsnap=warn"
    }
}

pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    // a second init (tests, embedding) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .try_init();
}
