use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Installs a stderr subscriber. `RUST_LOG` wins over `level` when it is set.
///
/// Calling this twice keeps the first subscriber.
pub fn init_logging(level: &str) {
    let default_filter = format!("nestegg={level}");
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&default_filter));

    let installed = tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(false),
        )
        .try_init();

    if installed.is_ok() {
        tracing::debug!(filter = %default_filter, "logging initialized");
    }
}
