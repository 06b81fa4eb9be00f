//! Pipeline drivers: discover → filter → fetch → post-process → report

use super::BatchDownloader;
use crate::discovery::{RowParser, filter, timestamp_equals};
use crate::error::{Error, ListingError, Result};
use crate::report::{BatchReport, aggregate};
use crate::types::{CandidateRecord, Event, FetchTask, ProcessedResult, ResourceKind};
use crate::utils::{filename_from_url, numbered_name};
use std::collections::HashSet;
use tracing::{info, warn};

impl BatchDownloader {
    /// Download every archive URL, extract each one that arrived, and delete it afterwards
    ///
    /// Candidates are keyed by the URL's file name. A repeated URL is fetched
    /// once; a different URL whose file name is already taken is numbered
    /// (`data (1).zip`) so two tasks never write the same path.
    pub async fn fetch_archives<I, S>(&self, urls: I) -> Result<BatchReport>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let candidates: Vec<CandidateRecord> = urls
            .into_iter()
            .map(|url| {
                let url = url.into();
                CandidateRecord {
                    identifier: filename_from_url(&url),
                    timestamp: String::new(),
                    source_url: url,
                }
            })
            .collect();
        let candidates = dedupe_candidates(candidates);

        let tasks = candidates
            .iter()
            .map(|c| FetchTask::new(c.source_url.clone(), c.identifier.clone()))
            .collect();

        let kind = ResourceKind::Archive {
            dest_dir: self.config.download_dir().clone(),
        };
        self.run_batch(&candidates, tasks, &kind).await
    }

    /// Discover resources on the configured listing, keep those stamped with
    /// `target_timestamp`, fetch them, and report each one's column maximum
    pub async fn discover_and_aggregate(&self) -> Result<BatchReport> {
        let target = self
            .config
            .listing
            .target_timestamp
            .clone()
            .ok_or_else(|| Error::Config {
                message: "target_timestamp is required for discovery".to_string(),
                key: Some("target_timestamp".to_string()),
            })?;

        let kind = ResourceKind::Tabular {
            field: self.config.aggregate.field.clone(),
        };
        self.run_discovery(timestamp_equals(target), &kind).await
    }

    /// Discover resources on the configured listing and process those matching `predicate`
    ///
    /// A listing whose selector matches nothing yields an empty report. An
    /// unreachable listing is the only network failure returned as `Err`.
    pub async fn run_discovery<P>(&self, predicate: P, kind: &ResourceKind) -> Result<BatchReport>
    where
        P: Fn(&CandidateRecord) -> bool + Send,
    {
        let listing = &self.config.listing;
        let endpoint = listing.endpoint.as_deref().ok_or_else(|| Error::Config {
            message: "listing endpoint is required for discovery".to_string(),
            key: Some("endpoint".to_string()),
        })?;
        let parser = RowParser::new(listing.resource_suffix.clone()).with_base_url(endpoint)?;

        let rows = match self.lister.list(endpoint, &listing.row_selector).await {
            Ok(rows) => rows,
            Err(Error::Listing(ListingError::EmptyResult { .. })) => {
                warn!(endpoint, "listing matched no rows");
                self.emit(Event::ListingFetched {
                    endpoint: endpoint.to_string(),
                    rows: 0,
                });
                self.emit(Event::BatchComplete {
                    succeeded: 0,
                    failed: 0,
                });
                return Ok(BatchReport::default());
            }
            Err(e) => return Err(e),
        };

        self.emit(Event::ListingFetched {
            endpoint: endpoint.to_string(),
            rows: rows.len(),
        });

        let parsed = parser.parse_rows(rows);
        for rejected in &parsed.rejected {
            self.emit(Event::RowRejected {
                row: rejected.row.clone(),
                reason: rejected.reason.to_string(),
            });
        }

        let selected = dedupe_candidates(filter(parsed.candidates, predicate));
        info!(selected = selected.len(), "candidates selected");

        let tasks = selected
            .iter()
            .map(|c| FetchTask::new(c.source_url.clone(), parser.filename(c)))
            .collect();

        let report = self.run_batch(&selected, tasks, kind).await?;
        Ok(report.with_rejected_rows(parsed.rejected))
    }

    /// Fetch, post-process successes, and assemble the report
    async fn run_batch(
        &self,
        candidates: &[CandidateRecord],
        tasks: Vec<FetchTask>,
        kind: &ResourceKind,
    ) -> Result<BatchReport> {
        let outcomes = self.fetcher.fetch_all(tasks).await?;

        let mut processed: Vec<Option<ProcessedResult>> = Vec::with_capacity(outcomes.len());
        for (candidate, outcome) in candidates.iter().zip(&outcomes) {
            if outcome.is_success() {
                processed.push(Some(
                    self.post_processor.process(&candidate.identifier, outcome, kind).await,
                ));
            } else {
                info!(
                    identifier = %candidate.identifier,
                    "skipping post-processing after failed fetch"
                );
                processed.push(None);
            }
        }

        let report = aggregate(candidates, &outcomes, processed)?;

        info!(
            succeeded = report.succeeded(),
            failed = report.failed(),
            "batch complete"
        );
        self.emit(Event::BatchComplete {
            succeeded: report.succeeded(),
            failed: report.failed(),
        });

        Ok(report)
    }
}

/// Drop repeated source URLs and give every remaining candidate a unique identifier
///
/// Order is preserved. The first candidate keeps its identifier; a later one
/// from a different URL gets the next free numbered name.
fn dedupe_candidates(candidates: Vec<CandidateRecord>) -> Vec<CandidateRecord> {
    let mut seen_urls = HashSet::new();
    let mut taken = HashSet::new();
    let mut unique = Vec::with_capacity(candidates.len());

    for mut candidate in candidates {
        if !seen_urls.insert(candidate.source_url.clone()) {
            warn!(url = %candidate.source_url, "skipping repeated URL");
            continue;
        }

        if taken.contains(&candidate.identifier) {
            let mut n = 1;
            let mut renamed = numbered_name(&candidate.identifier, n);
            while taken.contains(&renamed) {
                n += 1;
                renamed = numbered_name(&candidate.identifier, n);
            }
            warn!(
                identifier = %candidate.identifier,
                renamed = %renamed,
                url = %candidate.source_url,
                "name already taken by another URL"
            );
            candidate.identifier = renamed;
        }

        taken.insert(candidate.identifier.clone());
        unique.push(candidate);
    }

    unique
}
