use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer, Registry};

/// Initialize the tracing subscriber. `RUST_LOG` overrides the default
/// level; `LOG_FORMAT=json` switches to flattened JSON output.
pub fn init_tracing(log_level: &str) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    let fmt_layer: Box<dyn Layer<Registry> + Send + Sync> =
        if std::env::var("LOG_FORMAT").as_deref() == Ok("json") {
            tracing_subscriber::fmt::layer()
                .with_file(true)
                .with_line_number(true)
                .json()
                .flatten_event(true)
                .boxed()
        } else {
            tracing_subscriber::fmt::layer()
                .with_file(true)
                .with_line_number(true)
                .boxed()
        };

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(env_filter)
        .init();
}
