//! Batch downloader split into focused submodules.
//!
//! The `BatchDownloader` struct and its methods are organized by concern:
//! - [`fetch`] - Concurrent fetching with per-task failure isolation
//! - [`pipeline`] - Archive and discovery pipeline drivers

pub mod fetch;
mod pipeline;

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
pub(crate) mod test_helpers;
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;

pub use fetch::Fetcher;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::listing::Lister;
use crate::post_processing::PostProcessor;
use crate::types::Event;
use std::sync::Arc;
use tokio::sync::broadcast;

/// Main downloader instance (cloneable - all fields are cheap to clone)
#[derive(Clone)]
pub struct BatchDownloader {
    /// Event broadcast channel sender (multiple subscribers supported)
    pub(crate) event_tx: broadcast::Sender<Event>,
    /// Configuration (wrapped in Arc for sharing across tasks)
    pub(crate) config: Arc<Config>,
    /// Listing endpoint reader
    pub(crate) lister: Lister,
    /// Concurrent fetcher writing into the download directory
    pub(crate) fetcher: Fetcher,
    /// Archive extraction and tabular aggregation
    pub(crate) post_processor: PostProcessor,
}

impl BatchDownloader {
    /// Create a downloader from a validated configuration
    ///
    /// One HTTP client (with the configured User-Agent and connect timeout)
    /// is shared by the lister and every fetch task.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let client = reqwest::Client::builder()
            .user_agent(config.fetch.user_agent.clone())
            .connect_timeout(config.fetch.connect_timeout)
            .build()
            .map_err(|e| Error::Config {
                message: format!("failed to create HTTP client: {}", e),
                key: Some("user_agent".to_string()),
            })?;

        let (event_tx, _rx) = broadcast::channel(1000);
        let config = Arc::new(config);

        Ok(Self {
            lister: Lister::new(client.clone()),
            fetcher: Fetcher::new(client, Arc::new(config.fetch.clone()), event_tx.clone()),
            post_processor: PostProcessor::new(event_tx.clone()),
            event_tx,
            config,
        })
    }

    /// Subscribe to pipeline events
    ///
    /// Events sent while nobody is subscribed are dropped.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.event_tx.subscribe()
    }

    /// Active configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    pub(crate) fn emit(&self, event: Event) {
        self.event_tx.send(event).ok();
    }
}
