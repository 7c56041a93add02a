use tracing_subscriber::{EnvFilter, fmt};

/// Install the stderr subscriber. `level` is a filter directive such as
/// `"warn"` or `"off"`; the environment is not consulted.
pub fn init_logging(level: &str) {
    let filter = EnvFilter::builder()
        .parse(level)
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    // A subscriber may already be installed when embedded or under test
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}
