//! Process diagnostics.
//!
//! Request records go to stdout through [`Logger`](super::Logger); internal
//! diagnostics (tower-http spans, sink failures, startup details) go through
//! `tracing` to stderr so the two streams never mix.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG` wins over the configured level.
pub fn init_tracing(log_level: &str) {
    let default_filter = format!("kanban_backend={log_level},tower_http={log_level}");

    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}
