//! Client configuration loaded from environment variables.
//!
//! All settings come from environment variables (or a `.env` file via
//! `dotenvy`).

use std::time::Duration;

/// Lower bound for every configured duration, in seconds.
const MIN_SECS: u64 = 1;

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines.
    Text,
    /// One JSON object per event.
    Json,
}

/// Configuration of the polling binary.
///
/// Loaded once at startup via [`ClientConfig::from_env`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Adapter host name or IP address, optionally with `:port`.
    pub host: String,

    /// Time between two device-info polls.
    pub poll_interval: Duration,

    /// Upper bound on a single poll. Enforced around the client call; the
    /// client itself waits indefinitely.
    pub request_timeout: Duration,

    /// Log output format.
    pub log_format: LogFormat,
}

impl ClientConfig {
    /// Loads configuration from environment variables.
    ///
    /// Falls back to defaults for everything except `ALTHERMA_HOST`.
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns an error if `ALTHERMA_HOST` is not set.
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();

        let host = std::env::var("ALTHERMA_HOST")
            .map_err(|_| "ALTHERMA_HOST must be set to the adapter's host name or IP")?;

        let poll_interval = parse_secs("ALTHERMA_POLL_INTERVAL_SECS", 30);
        let request_timeout = parse_secs("ALTHERMA_REQUEST_TIMEOUT_SECS", 10);
        let log_format = parse_log_format(std::env::var("ALTHERMA_LOG_FORMAT").ok().as_deref());

        Ok(Self {
            host,
            poll_interval,
            request_timeout,
            log_format,
        })
    }
}

/// Parses an environment variable as `T`, returning `default` on missing
/// or invalid values.
fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Parses a duration in whole seconds. Zero is raised to one second,
/// since a zero poll period panics in `tokio::time::interval`.
fn parse_secs(key: &str, default: u64) -> Duration {
    Duration::from_secs(parse_env(key, default).max(MIN_SECS))
}

/// Accepts `json` (case-insensitive); anything else is text.
fn parse_log_format(value: Option<&str>) -> LogFormat {
    match value {
        Some(v) if v.eq_ignore_ascii_case("json") => LogFormat::Json,
        _ => LogFormat::Text,
    }
}
