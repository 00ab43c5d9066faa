//! Poller configuration.
//!
//! Loads and saves user configuration from `~/.flightbar/config.ini` with
//! sensible defaults. The `[service]` section addresses the flight data
//! service; the `[poller]` section tunes the refresh schedule. The
//! `[flight]` section of the same file belongs to the
//! [store](crate::store) and is not read here.

use std::path::{Path, PathBuf};
use std::time::Duration;

use ini::Ini;
use thiserror::Error;

/// Default flight data service base URL.
pub const DEFAULT_BASE_URL: &str = "https://flightbar-55ccda97cd11.herokuapp.com";

/// Default refresh interval in minutes.
///
/// Flight status changes on the order of tens of minutes; anything faster
/// burns upstream API quota without showing the user anything new.
pub const DEFAULT_POLL_INTERVAL_MINS: u64 = 24;

/// Default HTTP request timeout in seconds.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("failed to read config file: {0}")]
    Read(#[from] ini::Error),

    /// Invalid configuration value
    #[error("invalid configuration: {section}.{key} = '{value}' - {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },
}

/// Configuration for the flight status poller.
#[derive(Debug, Clone)]
pub struct PollerConfig {
    /// Base URL of the flight data service.
    pub base_url: String,

    /// Shared secret sent in the `x-key` request header.
    pub api_key: String,

    /// How often the recurring refresh re-fetches the subscribed flight.
    pub poll_interval: Duration,

    /// Per-request HTTP timeout.
    pub http_timeout: Duration,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: String::new(),
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_MINS * 60),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }
}

impl PollerConfig {
    /// Load configuration from the default path (`~/.flightbar/config.ini`).
    ///
    /// Returns defaults if the home directory cannot be resolved or the
    /// file does not exist.
    pub fn load() -> Result<Self, ConfigError> {
        match config_file_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from a specific path.
    ///
    /// A missing file yields defaults; missing keys within an existing
    /// file fall back individually.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let doc = Ini::load_from_file(path)?;
        let mut config = Self::default();

        if let Some(service) = doc.section(Some("service")) {
            if let Some(base_url) = service.get("base_url") {
                config.base_url = base_url.trim_end_matches('/').to_string();
            }
            if let Some(api_key) = service.get("api_key") {
                config.api_key = api_key.to_string();
            }
        }

        if let Some(poller) = doc.section(Some("poller")) {
            if let Some(raw) = poller.get("interval_mins") {
                let mins = parse_positive(raw, "poller", "interval_mins")?;
                config.poll_interval = Duration::from_secs(mins * 60);
            }
            if let Some(raw) = poller.get("http_timeout_secs") {
                let secs = parse_positive(raw, "poller", "http_timeout_secs")?;
                config.http_timeout = Duration::from_secs(secs);
            }
        }

        Ok(config)
    }
}

/// Parse a strictly positive integer setting.
fn parse_positive(raw: &str, section: &str, key: &str) -> Result<u64, ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: raw.to_string(),
        reason: reason.to_string(),
    };

    let value: u64 = raw.trim().parse().map_err(|_| invalid("not a number"))?;
    if value == 0 {
        return Err(invalid("must be at least 1"));
    }
    Ok(value)
}

/// Default config file path: `~/.flightbar/config.ini`.
pub fn config_file_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".flightbar").join("config.ini"))
}
