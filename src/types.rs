//! Core types for batch-dl

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::error::{ErrorKind, RowParseError};

/// A listing row parsed into a structured record
///
/// Immutable once created; lives only for a single pipeline run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateRecord {
    /// Resource name without its suffix, e.g. "Divvy_Trips_2019_Q1"
    pub identifier: String,
    /// Date and time fragments joined by a single space, e.g. "2024-01-19 10:27"
    pub timestamp: String,
    /// URL the resource is fetched from
    pub source_url: String,
}

/// A listing row that could not be parsed, kept for reporting
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectedRow {
    /// The raw row text
    pub row: String,
    /// Why the row was rejected
    pub reason: RowParseError,
}

/// One resource to retrieve
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchTask {
    /// Source URL
    pub url: String,
    /// File name inside the destination directory
    pub destination_name: String,
}

impl FetchTask {
    /// Create a new fetch task
    pub fn new(url: impl Into<String>, destination_name: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            destination_name: destination_name.into(),
        }
    }
}

/// Result of one fetch task
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FetchOutcome {
    /// Body was fully written to disk
    Success {
        /// Where the body was written
        local_path: PathBuf,
        /// Number of body bytes written
        bytes: u64,
    },
    /// Fetch failed; siblings are unaffected
    Failure {
        /// Failure category
        kind: ErrorKind,
        /// Human-readable error message
        detail: String,
    },
}

impl FetchOutcome {
    /// Whether the fetch succeeded
    pub fn is_success(&self) -> bool {
        matches!(self, FetchOutcome::Success { .. })
    }

    /// Local path of a successful fetch
    pub fn local_path(&self) -> Option<&PathBuf> {
        match self {
            FetchOutcome::Success { local_path, .. } => Some(local_path),
            FetchOutcome::Failure { .. } => None,
        }
    }
}

/// How a fetched resource is transformed
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResourceKind {
    /// Extract every member next to the archive, then delete the archive
    Archive {
        /// Extraction directory
        dest_dir: PathBuf,
    },
    /// Compute the maximum of a numeric column
    Tabular {
        /// Column name
        field: String,
    },
}

/// Derived value for one candidate
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum ProcessedResult {
    /// Archive members written to disk
    Extracted {
        /// Paths of the extracted files
        artifact_paths: BTreeSet<PathBuf>,
    },
    /// Column maximum of a tabular resource
    Aggregated {
        /// Column name
        field: String,
        /// Maximum value
        value: f64,
    },
    /// Candidate produced no value
    Skipped {
        /// Failure category
        reason: ErrorKind,
        /// Human-readable error message
        detail: String,
    },
}

impl ProcessedResult {
    /// Build a `Skipped` result from a failed fetch, without post-processing
    pub fn from_failure(outcome: &FetchOutcome) -> Option<Self> {
        match outcome {
            FetchOutcome::Failure { kind, detail } => Some(ProcessedResult::Skipped {
                reason: *kind,
                detail: detail.clone(),
            }),
            FetchOutcome::Success { .. } => None,
        }
    }

    /// Whether this result carries a value
    pub fn is_success(&self) -> bool {
        !matches!(self, ProcessedResult::Skipped { .. })
    }
}

/// Event emitted during a pipeline run
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// Listing endpoint read
    ListingFetched {
        /// Endpoint URL
        endpoint: String,
        /// Number of rows matched by the selector
        rows: usize,
    },

    /// A listing row could not be parsed
    RowRejected {
        /// The raw row text
        row: String,
        /// Parse error message
        reason: String,
    },

    /// Fetch task started
    Fetching {
        /// Destination file name
        name: String,
        /// Source URL
        url: String,
    },

    /// Fetch task wrote its body to disk
    Fetched {
        /// Destination file name
        name: String,
        /// Local path of the file
        path: PathBuf,
        /// Bytes written
        bytes: u64,
    },

    /// Fetch task failed
    FetchFailed {
        /// Destination file name
        name: String,
        /// Failure category
        kind: ErrorKind,
        /// Error message
        error: String,
    },

    /// Archive extracted
    Extracted {
        /// Candidate identifier
        identifier: String,
        /// Number of files extracted
        files: usize,
    },

    /// Source archive deleted after extraction
    ArchiveRemoved {
        /// Path of the deleted archive
        path: PathBuf,
    },

    /// Column maximum computed
    Aggregated {
        /// Candidate identifier
        identifier: String,
        /// Column name
        field: String,
        /// Maximum value
        value: f64,
    },

    /// Candidate skipped
    Skipped {
        /// Candidate identifier
        identifier: String,
        /// Failure category
        reason: ErrorKind,
        /// Error message
        detail: String,
    },

    /// Pipeline run finished
    BatchComplete {
        /// Candidates with a value
        succeeded: usize,
        /// Candidates skipped
        failed: usize,
    },
}
