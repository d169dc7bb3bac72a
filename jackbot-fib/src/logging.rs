use tracing_subscriber::{
    EnvFilter,
    filter::LevelFilter,
    fmt,
    layer::SubscriberExt,
    util::{SubscriberInitExt, TryInitError},
};

/// Initialise default non-JSON logging, filtered by `RUST_LOG` and defaulting to `INFO`.
///
/// Fallbacks taken during an analysis are logged at `DEBUG`, so use eg/
/// `RUST_LOG=jackbot_fib=debug` to see them.
pub fn init_logging() -> Result<(), TryInitError> {
    tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt::layer())
        .try_init()
}

/// Initialise default JSON logging, filtered by `RUST_LOG` and defaulting to `INFO`.
pub fn init_json_logging() -> Result<(), TryInitError> {
    tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt::layer().json().flatten_event(true))
        .try_init()
}

fn env_filter() -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy()
}
