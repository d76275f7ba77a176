//! Tracing subscriber setup for binaries.
//!
//! Library crates only emit `tracing` events; installing a subscriber is the
//! application's job.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::LoggingConfig;

/// Install the global subscriber.  `RUST_LOG` wins over `cfg.filter`.
///
/// Returns `false` if a subscriber was already installed (harmless; the
/// existing one keeps running).
pub fn init_tracing(cfg: &LoggingConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cfg.filter.as_str()));

    let registry = tracing_subscriber::registry().with(filter);
    if cfg.json {
        registry.with(tracing_subscriber::fmt::layer().json()).try_init().is_ok()
    } else {
        registry.with(tracing_subscriber::fmt::layer()).try_init().is_ok()
    }
}
