use std::io::Stderr;
use tracing_subscriber::fmt::{self, format::DefaultFields, format::Format};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub fn init_cli_logger(verbose: bool) {
    let default_filter = if verbose {
        "wms_preview=debug,info"
    } else {
        "wms_preview=info"
    };

    tracing_subscriber::registry()
        .with(env_filter(default_filter))
        .with(stderr_layer().compact())
        .init();
}

/// JSON lines on stderr, for hosts that ship logs to a collector.
pub fn init_json_logger() {
    tracing_subscriber::registry()
        .with(env_filter("wms_preview=info"))
        .with(stderr_layer().json())
        .init();
}

fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Results go to stdout, so every log line is written to stderr.
fn stderr_layer<S>() -> fmt::Layer<S, DefaultFields, Format, fn() -> Stderr> {
    fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr as fn() -> Stderr)
}
