//! Logging infrastructure
//!
//! Structured tracing output; `RUST_LOG` overrides the configured level.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the global tracing subscriber.
pub fn init(log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("referral_settlement={},info", log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
