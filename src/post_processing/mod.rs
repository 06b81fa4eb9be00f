//! Post-processing for fetched resources
//!
//! Each successfully fetched resource is transformed according to its
//! [`ResourceKind`]:
//! 1. Archive - extract every member, then delete the archive
//! 2. Tabular - compute the maximum of one numeric column
//!
//! Failures never propagate: they come back as [`ProcessedResult::Skipped`].

use crate::error::{Error, PostProcessError, Result};
use crate::extraction::extract_archive;
use crate::types::{Event, FetchOutcome, ProcessedResult, ResourceKind};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tokio::sync::broadcast;
use tracing::{info, warn};

mod cleanup;
pub mod tabular;

use cleanup::remove_archive;

/// Post-processing executor
#[derive(Clone)]
pub struct PostProcessor {
    /// Event channel for emitting pipeline events
    event_tx: broadcast::Sender<Event>,
}

impl PostProcessor {
    /// Create a new post-processor
    pub fn new(event_tx: broadcast::Sender<Event>) -> Self {
        Self { event_tx }
    }

    /// Transform one fetch outcome into the candidate's result
    ///
    /// A failed fetch becomes `Skipped` directly; nothing is read from disk.
    pub async fn process(
        &self,
        identifier: &str,
        outcome: &FetchOutcome,
        kind: &ResourceKind,
    ) -> ProcessedResult {
        let local_path = match outcome {
            FetchOutcome::Success { local_path, .. } => local_path,
            FetchOutcome::Failure { kind, detail } => {
                return ProcessedResult::Skipped {
                    reason: *kind,
                    detail: detail.clone(),
                };
            }
        };

        let result = match kind {
            ResourceKind::Archive { dest_dir } => {
                self.run_archive_stage(identifier, local_path, dest_dir).await
            }
            ResourceKind::Tabular { field } => {
                self.run_tabular_stage(identifier, local_path, field).await
            }
        };

        match result {
            Ok(processed) => processed,
            Err(e) => {
                warn!(identifier, ?local_path, error = %e, "post-processing failed");
                let skipped = ProcessedResult::Skipped {
                    reason: e.kind(),
                    detail: e.to_string(),
                };
                self.event_tx
                    .send(Event::Skipped {
                        identifier: identifier.to_string(),
                        reason: e.kind(),
                        detail: e.to_string(),
                    })
                    .ok();
                skipped
            }
        }
    }

    /// Extract, then delete the archive only if extraction succeeded
    async fn run_archive_stage(
        &self,
        identifier: &str,
        archive_path: &Path,
        dest_dir: &Path,
    ) -> Result<ProcessedResult> {
        let files = extract_archive(archive_path, dest_dir).await?;

        info!(
            identifier,
            ?archive_path,
            files = files.len(),
            "extracted archive"
        );
        self.event_tx
            .send(Event::Extracted {
                identifier: identifier.to_string(),
                files: files.len(),
            })
            .ok();

        remove_archive(archive_path).await?;
        self.event_tx
            .send(Event::ArchiveRemoved {
                path: archive_path.to_path_buf(),
            })
            .ok();

        Ok(ProcessedResult::Extracted {
            artifact_paths: files.into_iter().collect::<BTreeSet<PathBuf>>(),
        })
    }

    /// Compute the column maximum on a blocking thread
    async fn run_tabular_stage(
        &self,
        identifier: &str,
        path: &Path,
        field: &str,
    ) -> Result<ProcessedResult> {
        let path_owned = path.to_path_buf();
        let field_owned = field.to_string();

        let value = tokio::task::spawn_blocking(move || {
            tabular::column_max(&path_owned, &field_owned)
        })
        .await
        .map_err(|e| {
            Error::PostProcess(PostProcessError::MalformedTable {
                path: path.to_path_buf(),
                reason: format!("aggregation task panicked: {}", e),
            })
        })??;

        info!(identifier, ?path, field, value, "computed column maximum");
        self.event_tx
            .send(Event::Aggregated {
                identifier: identifier.to_string(),
                field: field.to_string(),
                value,
            })
            .ok();

        Ok(ProcessedResult::Aggregated {
            field: field.to_string(),
            value,
        })
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;
