//! Tracing subscriber setup.

use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::EnvFilter;


/// Environment variable overriding the log filter, e.g. `MDG_LOG=debug`.
pub const LOG_ENV: &str = "MDG_LOG";


/// Install the global subscriber, writing to stderr.
///
/// Defaults to `info` (`debug` when verbose). Calling twice is a no-op.
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S%.3f".to_string()))
        .with_target(false)
        .try_init();
}
