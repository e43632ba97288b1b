//! Process-wide tracing setup.

use tracing_subscriber::{fmt, EnvFilter};

/// Set to `json` for one JSON object per log line.
pub const LOG_FORMAT_ENV: &str = "PLAYSYNC_LOG_FORMAT";

/// Install the global subscriber, writing to stderr. `RUST_LOG` wins;
/// otherwise `info`.
///
/// Safe to call more than once: later calls are no-ops.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var(LOG_FORMAT_ENV)
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        let _ = fmt()
            .json()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .try_init();
    } else {
        let _ = fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .try_init();
    }
}
