use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset. Keeps the per-request access log visible.
pub const DEFAULT_FILTER: &str = "info,myflix_api=debug,tower_http=debug,sqlx=warn";

pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber. Log lines go to stderr so stdout stays free for command output.
pub fn init() {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .init();
}
