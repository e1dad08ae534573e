use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter, e.g. `TUDU_LOG=debug`
pub const LOG_ENV: &str = "TUDU_LOG";

/// Install the stderr log subscriber. Defaults to `warn` so diagnostics such
/// as ignored stale moves show up without drowning command output.
pub fn init() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    // A second call (e.g. from tests) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}
