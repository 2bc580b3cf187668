//! Configuration types for thing-archiver

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Public Thingiverse API endpoint
pub const DEFAULT_API_BASE: &str = "https://api.thingiverse.com";

/// Environment variable holding the API token
pub const ENV_TOKEN_NAME: &str = "THINGIVERSE_TOKEN";

/// Environment variable overriding the API base URL
pub const ENV_API_BASE_NAME: &str = "THINGIVERSE_API_BASE";

/// Default delay between successive listing pages and thing archives, in seconds
pub const DEFAULT_THROTTLE_SECONDS: f64 = 5.0;

/// Remote API settings (endpoint, credentials, timeouts)
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ApiConfig {
    /// API base URL without trailing slash (default: "https://api.thingiverse.com")
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Bearer token sent with API requests and file downloads
    #[serde(default, skip_serializing)]
    pub token: Option<String>,

    /// Per-request timeout (default: 60 seconds)
    #[serde(default = "default_timeout", with = "duration_serde")]
    pub timeout: Duration,

    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token: None,
            timeout: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

/// Archive behavior settings
///
/// Output location, throttle and re-fetch policy are per call arguments of
/// [`Archiver`](crate::Archiver); [`DEFAULT_THROTTLE_SECONDS`] is the CLI default.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ArchiveConfig {
    /// Number of things requested per listing page (default: 30)
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}

/// Retry behavior for transient remote failures
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of retry attempts after the first try (default: 2)
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Initial delay before first retry (default: 1 second)
    #[serde(default = "default_initial_delay", with = "duration_serde")]
    pub initial_delay: Duration,

    /// Maximum delay between retries (default: 30 seconds)
    #[serde(default = "default_max_delay", with = "duration_serde")]
    pub max_delay: Duration,

    /// Multiplier for exponential backoff (default: 2.0)
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,

    /// Add random jitter to delays (default: true)
    #[serde(default = "default_true")]
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_delay: default_initial_delay(),
            max_delay: default_max_delay(),
            backoff_multiplier: default_backoff_multiplier(),
            jitter: true,
        }
    }
}

impl RetryConfig {
    /// Configuration that never retries
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            max_attempts: 0,
            ..Self::default()
        }
    }
}

/// Main configuration for thing-archiver
///
/// Passed into [`Archiver`](crate::Archiver) at construction so tests can point
/// the API at a mock server and switch retries off.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// Remote API settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Listing settings
    #[serde(default)]
    pub archive: ArchiveConfig,

    /// Retry policy for remote calls
    #[serde(default)]
    pub retry: RetryConfig,
}

impl Config {
    /// Check the configuration for values the archiver cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.api.base_url.trim().is_empty() {
            return Err(Error::config("API base URL must not be empty", "base_url"));
        }
        url::Url::parse(&self.api.base_url).map_err(|e| {
            Error::config(
                format!("invalid API base URL '{}': {}", self.api.base_url, e),
                "base_url",
            )
        })?;
        if self.archive.page_size == 0 {
            return Err(Error::config("page size must be at least 1", "page_size"));
        }
        if self.retry.backoff_multiplier < 1.0 {
            return Err(Error::config(
                "backoff multiplier must be at least 1.0",
                "backoff_multiplier",
            ));
        }
        Ok(())
    }
}

/// Convert a user-supplied throttle in seconds into a `Duration`
pub fn throttle_from_secs(seconds: f64) -> Result<Duration> {
    Duration::try_from_secs_f64(seconds).map_err(|_| {
        Error::config(
            format!("throttle must be a finite, non-negative number of seconds (got {seconds})"),
            "throttle",
        )
    })
}

/// Resolve the API token from (in order of precedence):
/// 1. The explicit value (e.g. `--token`)
/// 2. The `THINGIVERSE_TOKEN` environment variable
///
/// # Errors
///
/// Returns [`Error::Config`] when neither source yields a non-empty token.
pub fn resolve_token(explicit: Option<&str>) -> Result<String> {
    resolve_token_from(explicit, std::env::var(ENV_TOKEN_NAME).ok())
}

/// Token resolution with the environment value passed in
pub fn resolve_token_from(explicit: Option<&str>, env_value: Option<String>) -> Result<String> {
    if let Some(token) = explicit.map(str::trim).filter(|t| !t.is_empty()) {
        return Ok(token.to_string());
    }

    if let Some(token) = env_value.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        return Ok(token.to_string());
    }

    Err(Error::config(
        format!(
            "no auth token found. Provide one via:\n  1. --token argument\n  2. {ENV_TOKEN_NAME} environment variable"
        ),
        "token",
    ))
}

fn default_base_url() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_timeout() -> Duration {
    Duration::from_secs(60)
}

fn default_user_agent() -> String {
    format!("thing-archiver/{}", env!("CARGO_PKG_VERSION"))
}

fn default_page_size() -> usize {
    30
}

fn default_max_attempts() -> u32 {
    2
}

fn default_initial_delay() -> Duration {
    Duration::from_secs(1)
}

fn default_max_delay() -> Duration {
    Duration::from_secs(30)
}

fn default_backoff_multiplier() -> f64 {
    2.0
}

fn default_true() -> bool {
    true
}

// Durations are stored as (fractional) seconds
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_f64(duration.as_secs_f64())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(serde::de::Error::custom)
    }
}
