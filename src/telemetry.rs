//! Telemetry logic.
//! Structured logging with an environment-driven filter.

use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber.
///
/// `RUST_LOG` overrides the default filter.
pub fn init() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("mercato=info,tower_http=debug"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
