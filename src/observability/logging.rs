//! # Logging
//!
//! Tracing subscriber setup. The filter comes from `RUST_LOG` when set,
//! otherwise `commit_status_notifier=info`.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "commit_status_notifier=info";

/// Install the global tracing subscriber
///
/// `format` is `json` or `text`; anything else falls back to `text`.
///
/// # Errors
/// Returns an error if a global subscriber is already installed.
pub fn init_logging(format: &str, enable_color: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into());

    let result = if format.eq_ignore_ascii_case("json") {
        tracing_subscriber::fmt()
            .json()
            .with_current_span(true)
            .with_env_filter(filter)
            .try_init()
    } else {
        tracing_subscriber::fmt()
            .with_ansi(enable_color)
            .with_env_filter(filter)
            .try_init()
    };

    result.map_err(|e| anyhow::anyhow!("Failed to initialize tracing subscriber: {e}"))
}
