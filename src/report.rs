//! Batch report assembly
//!
//! Zips candidates, fetch outcomes and post-processing results (all
//! index-aligned) into one entry per candidate.

use crate::error::{Error, Result};
use crate::types::{CandidateRecord, FetchOutcome, ProcessedResult, RejectedRow};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Final result of a pipeline run, keyed by candidate identifier
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    /// One entry per candidate that survived filtering
    pub entries: BTreeMap<String, ProcessedResult>,
    /// Listing rows that could not be parsed (discovery runs only)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rejected_rows: Vec<RejectedRow>,
}

impl BatchReport {
    /// Number of candidates in the report
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the report has no candidates
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Result for one candidate
    pub fn get(&self, identifier: &str) -> Option<&ProcessedResult> {
        self.entries.get(identifier)
    }

    /// Number of candidates that produced a value
    pub fn succeeded(&self) -> usize {
        self.entries.values().filter(|r| r.is_success()).count()
    }

    /// Number of candidates that were skipped
    pub fn failed(&self) -> usize {
        self.len() - self.succeeded()
    }

    /// Attach the rows rejected while parsing the listing
    pub fn with_rejected_rows(mut self, rejected_rows: Vec<RejectedRow>) -> Self {
        self.rejected_rows = rejected_rows;
        self
    }

    /// One human-readable status line per candidate, sorted by identifier
    pub fn status_lines(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|(identifier, result)| match result {
                ProcessedResult::Extracted { artifact_paths } => format!(
                    "{}: extracted {} file(s)",
                    identifier,
                    artifact_paths.len()
                ),
                ProcessedResult::Aggregated { field, value } => {
                    format!("{}: max {} = {}", identifier, field, value)
                }
                ProcessedResult::Skipped { reason, detail } => {
                    format!("{}: skipped ({}): {}", identifier, reason, detail)
                }
            })
            .collect()
    }

    /// Pretty-printed JSON form of the report
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Build the report from three index-aligned sequences
///
/// `processed[i]` is `None` when `outcomes[i]` is a failure; that entry is
/// synthesized from the failure itself. Mismatched lengths or a repeated
/// identifier are rejected rather than silently dropping or overwriting.
pub fn aggregate(
    candidates: &[CandidateRecord],
    outcomes: &[FetchOutcome],
    processed: Vec<Option<ProcessedResult>>,
) -> Result<BatchReport> {
    if candidates.len() != outcomes.len() || candidates.len() != processed.len() {
        return Err(Error::Report(format!(
            "misaligned results: {} candidates, {} outcomes, {} processed",
            candidates.len(),
            outcomes.len(),
            processed.len()
        )));
    }

    let mut entries = BTreeMap::new();

    for ((candidate, outcome), processed) in candidates.iter().zip(outcomes).zip(processed) {
        let result = match (ProcessedResult::from_failure(outcome), processed) {
            (Some(skipped), _) => skipped,
            (None, Some(result)) => result,
            (None, None) => {
                return Err(Error::Report(format!(
                    "candidate {} was fetched but never processed",
                    candidate.identifier
                )));
            }
        };

        if entries.insert(candidate.identifier.clone(), result).is_some() {
            return Err(Error::Report(format!(
                "duplicate candidate identifier {}",
                candidate.identifier
            )));
        }
    }

    debug!(entries = entries.len(), "assembled batch report");

    Ok(BatchReport {
        entries,
        rejected_rows: Vec::new(),
    })
}
