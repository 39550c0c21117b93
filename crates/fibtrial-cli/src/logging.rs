use std::io::IsTerminal;
use tracing_subscriber::{fmt, EnvFilter};

pub const ENV_LOG_FORMAT: &str = "FIBTRIAL_LOG_FORMAT";

/// Installs the global subscriber on stderr. Safe to call more than once.
pub fn init_logging(log_level: &str) {
    let filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var(ENV_LOG_FORMAT).ok().as_deref() == Some("json");

    let result = if json {
        fmt()
            .with_env_filter(filter)
            .json()
            .with_timer(fmt::time::UtcTime::rfc_3339())
            .with_target(true)
            .with_current_span(false)
            .with_span_list(false)
            .with_writer(std::io::stderr)
            .try_init()
    } else {
        fmt()
            .with_env_filter(filter)
            .with_ansi(std::io::stderr().is_terminal())
            .with_target(false)
            .with_writer(std::io::stderr)
            .try_init()
    };

    if result.is_err() {
        tracing::debug!("logging already initialised");
    }
}
