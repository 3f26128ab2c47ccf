use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt, EnvFilter, Registry};

/// Installs the global `tracing` subscriber. `RUST_LOG` overrides the
/// default `info` filter. Calling it twice is harmless; the second install
/// is ignored.
pub fn init_logging() {
    let filter: EnvFilter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let formatting_layer = fmt::layer()
        .with_timer(UtcTime::rfc_3339())
        .with_thread_ids(true)
        .with_target(true)
        .compact();

    let subscriber = Registry::default().with(filter).with(formatting_layer);

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        tracing::debug!("global subscriber already installed");
    }
}
