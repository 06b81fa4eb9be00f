//! # batch-dl
//!
//! Batch fetcher for remote data files: discover candidates on an HTML
//! directory listing (or take a fixed URL list), fetch them concurrently,
//! then post-process each arrival.
//!
//! ## Pipeline
//!
//! discover → filter → fetch (concurrent) → post-process → report
//!
//! - Archives are extracted into the download directory and then deleted
//! - Tabular files are reduced to the maximum of one numeric column
//! - A failed candidate never aborts its siblings; it shows up in the
//!   [`BatchReport`] as skipped, with the failure kind
//!
//! ## Quick Start
//!
//! ```no_run
//! use batch_dl::{BatchDownloader, Config};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut config = Config::default();
//!     config.listing.endpoint =
//!         Some("https://www.ncei.noaa.gov/data/local-climatological-data/access/2021/".into());
//!     config.listing.target_timestamp = Some("2024-01-19 10:27".into());
//!
//!     let downloader = BatchDownloader::new(config)?;
//!
//!     // Subscribe to events
//!     let mut events = downloader.subscribe();
//!     tokio::spawn(async move {
//!         while let Ok(event) = events.recv().await {
//!             println!("Event: {:?}", event);
//!         }
//!     });
//!
//!     let report = downloader.discover_and_aggregate().await?;
//!     for line in report.status_lines() {
//!         println!("{line}");
//!     }
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Configuration types
pub mod config;
/// Row parsing and candidate selection
pub mod discovery;
/// Batch downloader (fetching and pipeline drivers)
pub mod downloader;
/// Error types
pub mod error;
/// Archive extraction
pub mod extraction;
/// HTML directory listing retrieval
pub mod listing;
/// Post-processing of fetched resources
pub mod post_processing;
/// Batch report assembly
pub mod report;
/// Core types and events
pub mod types;
/// Utility functions
pub mod utils;

// Re-export commonly used types
pub use config::{AggregateConfig, Config, FetchConfig, ListingConfig};
pub use discovery::{RowParser, filter, timestamp_between, timestamp_equals};
pub use downloader::{BatchDownloader, Fetcher};
pub use error::{
    Error, ErrorKind, FetchError, ListingError, PostProcessError, Result, RowParseError,
};
pub use listing::Lister;
pub use post_processing::PostProcessor;
pub use report::{BatchReport, aggregate};
pub use types::{
    CandidateRecord, Event, FetchOutcome, FetchTask, ProcessedResult, RejectedRow, ResourceKind,
};
