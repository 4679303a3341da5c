//! Tracing subscriber setup for frontends

use murmur_core::MurmurError;
use tracing_subscriber::EnvFilter;

/// Install a global fmt subscriber.
///
/// `RUST_LOG` wins when set; otherwise `default_filter` (usually
/// [`crate::AppConfig::log_filter`]) is used. Fails if a global subscriber is
/// already installed or the directive does not parse.
pub fn init(default_filter: &str) -> Result<(), MurmurError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_filter).map_err(|e| {
            MurmurError::config(format!("Invalid log filter '{default_filter}': {e}"))
        })?,
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| MurmurError::internal(format!("Failed to install tracing subscriber: {e}")))
}
