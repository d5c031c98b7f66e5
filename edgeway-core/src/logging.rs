use tracing_subscriber::{EnvFilter, fmt};

const DEFAULT_FILTER: &str = "info";

/// Install the process-wide subscriber.
///
/// Structured JSON on stdout, filtered by `RUST_LOG` (default `info`).
/// When `TOKIO_CONSOLE` is set the tokio-console subscriber is installed
/// instead, since the two cannot share the global dispatcher.
pub fn init_logging() {
    if std::env::var("TOKIO_CONSOLE").is_ok() {
        init_console_logging();
    } else {
        init_json_logging();
    }
}

pub fn init_json_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    fmt()
        .with_env_filter(filter)
        .json()
        .flatten_event(true)
        .with_current_span(false)
        .init();
}

fn init_console_logging() {
    console_subscriber::init();
}
