//! Error types for batch-dl
//!
//! This module provides the error handling for the library:
//! - Domain-specific error types (Listing, RowParse, Fetch, PostProcess)
//! - A flat [`ErrorKind`] taxonomy that every error maps onto, used when a
//!   failure is captured as a per-candidate result instead of propagated
//! - Context information (URL, path, status code, field name, etc.)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Result type alias for batch-dl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for batch-dl
///
/// Only errors without a per-candidate scope (listing endpoint unreachable,
/// destination directory uncreatable, invalid configuration) escape a pipeline
/// run as `Err`. Everything else is folded into the candidate's own result.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "row_selector")
        key: Option<String>,
    },

    /// Listing endpoint could not be read or scraped
    #[error("listing error: {0}")]
    Listing(#[from] ListingError),

    /// A single resource fetch failed
    #[error("fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Post-processing error (extraction, cleanup, tabular aggregation)
    #[error("post-processing error: {0}")]
    PostProcess(#[from] PostProcessError),

    /// Batch report could not be assembled from the per-candidate results
    #[error("report error: {0}")]
    Report(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors raised while reading the listing endpoint
#[derive(Debug, Error)]
pub enum ListingError {
    /// Endpoint could not be reached (DNS, connect, TLS, body read)
    #[error("listing endpoint {endpoint} unreachable: {reason}")]
    Unreachable {
        /// The listing endpoint
        endpoint: String,
        /// The transport error message
        reason: String,
    },

    /// Endpoint answered with a non-success status
    #[error("listing endpoint {endpoint} returned HTTP {status}")]
    HttpStatus {
        /// The listing endpoint
        endpoint: String,
        /// The HTTP status code
        status: u16,
    },

    /// The row selector is not valid CSS
    #[error("invalid row selector {selector:?}: {reason}")]
    InvalidSelector {
        /// The selector as configured
        selector: String,
        /// Why the selector was rejected
        reason: String,
    },

    /// No elements matched the row selector (callers treat this as zero candidates)
    #[error("no elements matching {selector:?} at {endpoint}")]
    EmptyResult {
        /// The listing endpoint
        endpoint: String,
        /// The selector that matched nothing
        selector: String,
    },
}

/// Errors raised while parsing a single listing row
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RowParseError {
    /// The first token does not contain the resource suffix
    #[error("row {row:?} has no {suffix:?} marker")]
    MissingSuffix {
        /// The raw row text
        row: String,
        /// The suffix that was looked for
        suffix: String,
    },

    /// The row has fewer whitespace-separated tokens than required
    #[error("row {row:?} has too few tokens ({found})")]
    TooFewTokens {
        /// The raw row text
        row: String,
        /// Number of tokens found
        found: usize,
    },

    /// The resource name is not a plain file name (path separators, `.` or `..`)
    #[error("row {row:?} names unsafe resource {name:?}")]
    UnsafeName {
        /// The raw row text
        row: String,
        /// The offending resource name
        name: String,
    },
}

/// Errors raised by one fetch task
#[derive(Debug, Error)]
pub enum FetchError {
    /// The server answered with a non-success status
    #[error("HTTP {status} fetching {url}")]
    HttpStatus {
        /// The requested URL
        url: String,
        /// The HTTP status code
        status: u16,
    },

    /// The request or body stream failed at the transport level
    #[error("transport error fetching {url}: {reason}")]
    Transport {
        /// The requested URL
        url: String,
        /// The transport error message
        reason: String,
    },

    /// Writing the body to disk failed
    #[error("failed to write {path}: {source}")]
    Write {
        /// The destination file
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The task exceeded its configured time budget
    #[error("fetching {url} timed out after {after:?}")]
    Timeout {
        /// The requested URL
        url: String,
        /// The configured per-task timeout
        after: Duration,
    },

    /// Destination name would resolve outside the destination directory
    #[error("refusing to write {name:?} outside the destination directory")]
    InvalidDestination {
        /// The rejected destination name
        name: String,
    },

    /// Destination directory could not be created
    #[error("failed to create destination directory {path}: {source}")]
    DestinationDir {
        /// The destination directory
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Post-processing errors (archive extraction, archive removal, tabular aggregation)
#[derive(Debug, Error)]
pub enum PostProcessError {
    /// File is not a readable archive
    #[error("{archive} is not a valid archive: {reason}")]
    CorruptArchive {
        /// The archive file
        archive: PathBuf,
        /// The codec error message
        reason: String,
    },

    /// Extraction failed for a reason other than archive corruption
    #[error("extraction failed for {archive}: {reason}")]
    ExtractionFailed {
        /// The archive file
        archive: PathBuf,
        /// The reason extraction failed
        reason: String,
    },

    /// Access control blocked reading, writing or removing a file
    #[error("permission denied for {path}: {reason}")]
    PermissionDenied {
        /// The path that could not be accessed
        path: PathBuf,
        /// The underlying error message
        reason: String,
    },

    /// The fetched file vanished before it could be processed
    #[error("file not found: {path}")]
    NotFound {
        /// The missing path
        path: PathBuf,
    },

    /// Any other filesystem failure while reading or writing a file
    #[error("filesystem error on {path}: {reason}")]
    Filesystem {
        /// The path being accessed
        path: PathBuf,
        /// The underlying error message
        reason: String,
    },

    /// Removing the source archive failed after extraction
    #[error("failed to remove {path}: {reason}")]
    CleanupFailed {
        /// The archive that could not be removed
        path: PathBuf,
        /// The underlying error message
        reason: String,
    },

    /// The aggregate column does not exist in the table header
    #[error("field {field:?} not found in {path}")]
    MissingField {
        /// The tabular file
        path: PathBuf,
        /// The requested column name
        field: String,
    },

    /// Tabular content could not be parsed
    #[error("malformed table {path}: {reason}")]
    MalformedTable {
        /// The tabular file
        path: PathBuf,
        /// What was wrong with it
        reason: String,
    },
}

/// Flat failure taxonomy reported per candidate
///
/// Serialized in snake_case so reports stay machine-readable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Unreachable host, transport failure or non-2xx status
    NetworkFailure,
    /// Disk write failure, disk space, or other filesystem trouble
    FilesystemFailure,
    /// Access control blocked a filesystem operation
    PermissionDenied,
    /// A file expected on disk was missing
    NotFound,
    /// Malformed listing row or malformed tabular content
    ParseFailure,
    /// File is not a valid archive
    CorruptArchive,
    /// Aggregate column absent from the table
    MissingField,
    /// Per-task timeout elapsed
    Timeout,
    /// Listing selector matched nothing
    EmptyResult,
}

impl ErrorKind {
    /// Machine-readable code for this kind
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::NetworkFailure => "network_failure",
            ErrorKind::FilesystemFailure => "filesystem_failure",
            ErrorKind::PermissionDenied => "permission_denied",
            ErrorKind::NotFound => "not_found",
            ErrorKind::ParseFailure => "parse_failure",
            ErrorKind::CorruptArchive => "corrupt_archive",
            ErrorKind::MissingField => "missing_field",
            ErrorKind::Timeout => "timeout",
            ErrorKind::EmptyResult => "empty_result",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<std::io::ErrorKind> for ErrorKind {
    fn from(kind: std::io::ErrorKind) -> Self {
        match kind {
            std::io::ErrorKind::NotFound => ErrorKind::NotFound,
            std::io::ErrorKind::PermissionDenied => ErrorKind::PermissionDenied,
            std::io::ErrorKind::TimedOut => ErrorKind::Timeout,
            _ => ErrorKind::FilesystemFailure,
        }
    }
}

impl Error {
    /// Map this error onto the per-candidate failure taxonomy
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Config { .. } | Error::Report(_) => ErrorKind::FilesystemFailure,
            Error::Listing(e) => e.kind(),
            Error::Fetch(e) => e.kind(),
            Error::PostProcess(e) => e.kind(),
            Error::Io(e) => e.kind().into(),
            Error::Serialization(_) => ErrorKind::ParseFailure,
        }
    }
}

impl ListingError {
    /// Map this error onto the per-candidate failure taxonomy
    pub fn kind(&self) -> ErrorKind {
        match self {
            ListingError::Unreachable { .. } | ListingError::HttpStatus { .. } => {
                ErrorKind::NetworkFailure
            }
            ListingError::InvalidSelector { .. } => ErrorKind::ParseFailure,
            ListingError::EmptyResult { .. } => ErrorKind::EmptyResult,
        }
    }
}

impl FetchError {
    /// Map this error onto the per-candidate failure taxonomy
    pub fn kind(&self) -> ErrorKind {
        match self {
            FetchError::HttpStatus { .. } | FetchError::Transport { .. } => {
                ErrorKind::NetworkFailure
            }
            FetchError::Write { source, .. } | FetchError::DestinationDir { source, .. } => {
                match source.kind() {
                    std::io::ErrorKind::PermissionDenied => ErrorKind::PermissionDenied,
                    _ => ErrorKind::FilesystemFailure,
                }
            }
            FetchError::Timeout { .. } => ErrorKind::Timeout,
            FetchError::InvalidDestination { .. } => ErrorKind::FilesystemFailure,
        }
    }
}

impl PostProcessError {
    /// Map this error onto the per-candidate failure taxonomy
    pub fn kind(&self) -> ErrorKind {
        match self {
            PostProcessError::CorruptArchive { .. } => ErrorKind::CorruptArchive,
            PostProcessError::ExtractionFailed { .. }
            | PostProcessError::Filesystem { .. }
            | PostProcessError::CleanupFailed { .. } => ErrorKind::FilesystemFailure,
            PostProcessError::PermissionDenied { .. } => ErrorKind::PermissionDenied,
            PostProcessError::NotFound { .. } => ErrorKind::NotFound,
            PostProcessError::MissingField { .. } => ErrorKind::MissingField,
            PostProcessError::MalformedTable { .. } => ErrorKind::ParseFailure,
        }
    }

    /// Classify an I/O error raised while touching `path` during post-processing
    pub fn from_io(path: &std::path::Path, error: &std::io::Error) -> Self {
        match error.kind() {
            std::io::ErrorKind::NotFound => PostProcessError::NotFound {
                path: path.to_path_buf(),
            },
            std::io::ErrorKind::PermissionDenied => PostProcessError::PermissionDenied {
                path: path.to_path_buf(),
                reason: error.to_string(),
            },
            _ => PostProcessError::Filesystem {
                path: path.to_path_buf(),
                reason: error.to_string(),
            },
        }
    }
}
