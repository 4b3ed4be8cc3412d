//! Configuration types for iptv-dl

use crate::error::{Error, Result};
use crate::types::TimeWindow;
use serde::{Deserialize, Serialize};
use std::{path::PathBuf, time::Duration};

/// Scrape behavior configuration (channels, time window, buffering)
///
/// Groups settings related to how the concurrent scrape run is shaped.
/// Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScrapeConfig {
    /// Channel queries to search for (default: `["sky calcio"]`)
    ///
    /// One fetch worker is launched per entry; duplicate entries launch
    /// duplicate independent workers.
    #[serde(default = "default_channels")]
    pub channels: Vec<String>,

    /// Time window scoping every query in the run (default: last day)
    #[serde(default)]
    pub time_window: TimeWindow,

    /// Collector channel capacity (default: 64)
    ///
    /// Backpressure bound on payloads in flight between workers and the
    /// collector. The effective capacity of a run is
    /// `max(collector_capacity, worker count)`, and the collector consumes
    /// concurrently with the workers, so this value shapes memory pressure
    /// but can never deadlock a run.
    #[serde(default = "default_collector_capacity")]
    pub collector_capacity: usize,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            channels: default_channels(),
            time_window: TimeWindow::default(),
            collector_capacity: default_collector_capacity(),
        }
    }
}

/// Output layout configuration (directories and file naming)
///
/// Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory under which the dated output directory is created (default: ".")
    #[serde(default = "default_base_dir")]
    pub base_dir: PathBuf,

    /// Prefix of the dated directory name (default: "data_")
    ///
    /// The directory is named `<dir_prefix><YYYY-MM-DD>` from the local
    /// date; runs on the same calendar day share it.
    #[serde(default = "default_dir_prefix")]
    pub dir_prefix: String,

    /// Prefix of each playlist file name (default: "iptv")
    ///
    /// Files are named `<file_prefix><N>.<file_extension>` with N counted
    /// from 1 in collection order.
    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,

    /// Extension of each playlist file (default: "m3u")
    #[serde(default = "default_file_extension")]
    pub file_extension: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            base_dir: default_base_dir(),
            dir_prefix: default_dir_prefix(),
            file_prefix: default_file_prefix(),
            file_extension: default_file_extension(),
        }
    }
}

/// Source provider configuration (search endpoint, HTTP behavior, retries)
///
/// Consumed by [`HttpSourceProvider`](crate::source::HttpSourceProvider);
/// irrelevant when a custom [`SourceProvider`](crate::source::SourceProvider)
/// implementation is injected. Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Base URL of the playlist search endpoint (no default, must be set)
    #[serde(default)]
    pub base_url: String,

    /// Prefix prepended to every channel query before searching
    /// (default: "extinf ")
    #[serde(default = "default_query_prefix")]
    pub query_prefix: String,

    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Per-request timeout (default: 30 seconds)
    #[serde(default = "default_timeout", with = "duration_serde")]
    pub timeout: Duration,

    /// Retry behavior for transient request failures
    #[serde(default)]
    pub retry: RetryConfig,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            query_prefix: default_query_prefix(),
            user_agent: default_user_agent(),
            timeout: default_timeout(),
            retry: RetryConfig::default(),
        }
    }
}

/// Retry configuration for transient provider failures
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of retry attempts (default: 3)
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
            max_attempts: 3,
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
            backoff_multiplier: 2.0,
            jitter: true,
        }
    }
}

/// Main configuration for the playlist scraper
///
/// Fields are organized into logical sub-configs:
/// - [`scrape`](ScrapeConfig) — channels, time window, collector sizing
/// - [`output`](OutputConfig) — output directory layout and file naming
/// - [`provider`](ProviderConfig) — search endpoint and HTTP behavior
///
/// All sub-config fields are flattened for serialization, so the JSON format
/// stays a single flat object.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// Scrape behavior settings
    #[serde(flatten)]
    pub scrape: ScrapeConfig,

    /// Output layout settings
    #[serde(flatten)]
    pub output: OutputConfig,

    /// Source provider settings
    #[serde(flatten)]
    pub provider: ProviderConfig,
}

impl Config {
    /// Validate the configuration
    ///
    /// # Errors
    /// Returns [`Error::Config`] naming the offending key when a setting is
    /// out of range. An empty channel list is valid (the run collects zero
    /// playlists).
    pub fn validate(&self) -> Result<()> {
        if self.scrape.collector_capacity == 0 {
            return Err(Error::Config {
                message: "collector capacity must be at least 1".to_string(),
                key: Some("scrape.collector_capacity".to_string()),
            });
        }
        if self.provider.retry.backoff_multiplier < 1.0 {
            return Err(Error::Config {
                message: format!(
                    "backoff multiplier must be >= 1.0, got {}",
                    self.provider.retry.backoff_multiplier
                ),
                key: Some("provider.retry.backoff_multiplier".to_string()),
            });
        }
        if self.output.file_extension.is_empty() {
            return Err(Error::Config {
                message: "file extension must not be empty".to_string(),
                key: Some("output.file_extension".to_string()),
            });
        }
        Ok(())
    }
}

fn default_channels() -> Vec<String> {
    vec!["sky calcio".to_string()]
}

fn default_collector_capacity() -> usize {
    64
}

fn default_base_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_dir_prefix() -> String {
    "data_".to_string()
}

fn default_file_prefix() -> String {
    "iptv".to_string()
}

fn default_file_extension() -> String {
    "m3u".to_string()
}

fn default_query_prefix() -> String {
    "extinf ".to_string()
}

fn default_user_agent() -> String {
    concat!("iptv-dl/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_max_attempts() -> u32 {
    3
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

// Duration serialization helper (integer seconds)
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = Config::default();
        assert_eq!(config.scrape.channels, vec!["sky calcio".to_string()]);
        assert_eq!(config.scrape.time_window, TimeWindow::Day);
        assert_eq!(config.scrape.collector_capacity, 64);
        assert_eq!(config.output.base_dir, PathBuf::from("."));
        assert_eq!(config.output.dir_prefix, "data_");
        assert_eq!(config.output.file_prefix, "iptv");
        assert_eq!(config.output.file_extension, "m3u");
        assert_eq!(config.provider.query_prefix, "extinf ");
        assert_eq!(config.provider.timeout, Duration::from_secs(30));
        assert_eq!(config.provider.retry.max_attempts, 3);
        assert!(config.provider.retry.jitter);
        config.validate().unwrap();
    }

    #[test]
    fn empty_object_deserializes_to_defaults() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config.scrape.channels, vec!["sky calcio".to_string()]);
        assert_eq!(config.provider.retry.max_attempts, 3);
    }

    #[test]
    fn partial_object_overrides_defaults() {
        let config: Config = serde_json::from_str(
            r#"{
                "channels": ["bbc one", "rai uno"],
                "time_window": "W",
                "base_url": "https://playlists.example.net/search",
                "timeout": 5
            }"#,
        )
        .unwrap();
        assert_eq!(config.scrape.channels.len(), 2);
        assert_eq!(config.scrape.time_window, TimeWindow::Week);
        assert_eq!(config.provider.base_url, "https://playlists.example.net/search");
        assert_eq!(config.provider.timeout, Duration::from_secs(5));
        // untouched fields keep their defaults
        assert_eq!(config.output.file_prefix, "iptv");
    }

    #[test]
    fn durations_serialize_as_seconds() {
        let config = Config::default();
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["timeout"], 30);
        assert_eq!(json["retry"]["initial_delay"], 1);
    }

    #[test]
    fn zero_collector_capacity_is_rejected() {
        let mut config = Config::default();
        config.scrape.collector_capacity = 0;
        let err = config.validate().unwrap_err();
        match err {
            Error::Config { key, .. } => {
                assert_eq!(key.as_deref(), Some("scrape.collector_capacity"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn sub_unit_backoff_multiplier_is_rejected() {
        let mut config = Config::default();
        config.provider.retry.backoff_multiplier = 0.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn empty_channel_list_is_valid() {
        let mut config = Config::default();
        config.scrape.channels.clear();
        config.validate().unwrap();
    }
}
