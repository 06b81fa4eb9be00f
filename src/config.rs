//! Configuration types for batch-dl

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::{path::Path, path::PathBuf, time::Duration};

/// Batches at or below this size run with no admission limit when
/// `max_concurrent_fetches` is left unset; larger batches are capped to it.
pub const AUTO_CONCURRENCY_LIMIT: usize = 16;

/// Fetch behavior configuration (destination, concurrency, timeouts)
///
/// Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Destination directory for fetched and extracted files (default: "./downloads")
    #[serde(default = "default_download_dir")]
    pub download_dir: PathBuf,

    /// Maximum number of fetch tasks in flight at once
    ///
    /// `None` picks automatically: unbounded for batches of up to
    /// [`AUTO_CONCURRENCY_LIMIT`] tasks, capped at that value above it.
    #[serde(default)]
    pub max_concurrent_fetches: Option<usize>,

    /// Per-task timeout covering request and body streaming (None = no timeout)
    #[serde(default, with = "optional_duration_serde")]
    pub task_timeout: Option<Duration>,

    /// TCP connect timeout for every request (default: 30 seconds)
    #[serde(default = "default_connect_timeout", with = "duration_serde")]
    pub connect_timeout: Duration,

    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            download_dir: default_download_dir(),
            max_concurrent_fetches: None,
            task_timeout: None,
            connect_timeout: default_connect_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

impl FetchConfig {
    /// Number of tasks allowed in flight for a batch of `batch_len` tasks
    pub fn effective_concurrency(&self, batch_len: usize) -> usize {
        let limit = match self.max_concurrent_fetches {
            Some(limit) => limit,
            None if batch_len <= AUTO_CONCURRENCY_LIMIT => batch_len,
            None => AUTO_CONCURRENCY_LIMIT,
        };
        limit.max(1)
    }
}

/// Listing discovery configuration
///
/// Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ListingConfig {
    /// Directory-style listing URL, ending in `/` (required for discovery runs)
    #[serde(default)]
    pub endpoint: Option<String>,

    /// CSS selector matching one element per listing row (default: "tr")
    #[serde(default = "default_row_selector")]
    pub row_selector: String,

    /// Suffix that separates a resource identifier from its date fragment (default: ".csv")
    #[serde(default = "default_resource_suffix")]
    pub resource_suffix: String,

    /// Timestamp a candidate must equal to be fetched, e.g. "2024-01-19 10:27"
    #[serde(default)]
    pub target_timestamp: Option<String>,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            row_selector: default_row_selector(),
            resource_suffix: default_resource_suffix(),
            target_timestamp: None,
        }
    }
}

/// Tabular aggregation configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AggregateConfig {
    /// Numeric column whose maximum is reported (default: "HourlyDryBulbTemperature")
    #[serde(default = "default_aggregate_field")]
    pub field: String,
}

impl Default for AggregateConfig {
    fn default() -> Self {
        Self {
            field: default_aggregate_field(),
        }
    }
}

/// Main configuration for [`BatchDownloader`](crate::BatchDownloader)
///
/// Fields are organized into sub-configs:
/// - [`fetch`](FetchConfig) — destination, concurrency, timeouts
/// - [`listing`](ListingConfig) — discovery endpoint, row selector, target timestamp
/// - [`aggregate`](AggregateConfig) — tabular column to aggregate
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// Fetch behavior settings
    #[serde(default)]
    pub fetch: FetchConfig,

    /// Listing discovery settings
    #[serde(default)]
    pub listing: ListingConfig,

    /// Tabular aggregation settings
    #[serde(default)]
    pub aggregate: AggregateConfig,
}

impl Config {
    /// Destination directory
    pub fn download_dir(&self) -> &PathBuf {
        &self.fetch.download_dir
    }

    /// Load configuration from a JSON file, then validate it
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to read config file '{}': {}", path.display(), e),
            ))
        })?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check settings that would make every run fail
    pub fn validate(&self) -> Result<()> {
        if self.fetch.max_concurrent_fetches == Some(0) {
            return Err(config_error(
                "max_concurrent_fetches must be at least 1",
                "max_concurrent_fetches",
            ));
        }
        if self.fetch.task_timeout == Some(Duration::ZERO) {
            return Err(config_error("task_timeout must be greater than zero", "task_timeout"));
        }
        if self.listing.row_selector.trim().is_empty() {
            return Err(config_error("row_selector must not be empty", "row_selector"));
        }
        if self.listing.resource_suffix.is_empty() {
            return Err(config_error("resource_suffix must not be empty", "resource_suffix"));
        }
        if self.aggregate.field.is_empty() {
            return Err(config_error("aggregate field must not be empty", "field"));
        }
        Ok(())
    }
}

fn config_error(message: &str, key: &str) -> Error {
    Error::Config {
        message: message.to_string(),
        key: Some(key.to_string()),
    }
}

fn default_download_dir() -> PathBuf {
    PathBuf::from("downloads")
}

fn default_connect_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36".to_string()
}

fn default_row_selector() -> String {
    "tr".to_string()
}

fn default_resource_suffix() -> String {
    ".csv".to_string()
}

fn default_aggregate_field() -> String {
    "HourlyDryBulbTemperature".to_string()
}

// Duration serialization helper
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

// Optional Duration serialization helper
mod optional_duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match duration {
            Some(d) => serializer.serialize_some(&d.as_secs()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = Option::<u64>::deserialize(deserializer)?;
        Ok(secs.map(Duration::from_secs))
    }
}
