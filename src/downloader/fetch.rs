//! Concurrent resource fetching
//!
//! Every task streams its body to `<name>.part` inside the destination
//! directory and renames it into place once the body is complete, so a failed
//! task never leaves a truncated file under its final name.

use crate::config::FetchConfig;
use crate::error::{FetchError, Result};
use crate::types::{Event, FetchOutcome, FetchTask};
use crate::utils::{ensure_dir_exists, is_plain_file_name, remove_partial_file};
use futures::stream::{self, StreamExt};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

/// Suffix of the in-progress file a task writes before renaming
const PARTIAL_SUFFIX: &str = ".part";

/// Fetches batches of [`FetchTask`]s into one destination directory
#[derive(Clone)]
pub struct Fetcher {
    client: reqwest::Client,
    config: Arc<FetchConfig>,
    event_tx: broadcast::Sender<Event>,
}

impl Fetcher {
    /// Create a fetcher writing into `config.download_dir`
    pub fn new(
        client: reqwest::Client,
        config: Arc<FetchConfig>,
        event_tx: broadcast::Sender<Event>,
    ) -> Self {
        Self {
            client,
            config,
            event_tx,
        }
    }

    /// Destination directory
    pub fn download_dir(&self) -> &Path {
        &self.config.download_dir
    }

    /// Fetch every task concurrently, returning one outcome per task in input order
    ///
    /// Only failure to create the destination directory is returned as `Err`;
    /// each task's own failure is captured in its [`FetchOutcome::Failure`].
    /// All tasks run to completion before this returns.
    pub async fn fetch_all(&self, tasks: Vec<FetchTask>) -> Result<Vec<FetchOutcome>> {
        let download_dir = self.download_dir().to_path_buf();
        ensure_dir_exists(&download_dir)
            .await
            .map_err(|source| FetchError::DestinationDir {
                path: download_dir.clone(),
                source,
            })?;

        let total = tasks.len();
        let concurrency = self.config.effective_concurrency(total);
        info!(total, concurrency, ?download_dir, "fetching batch");

        let mut indexed: Vec<(usize, FetchOutcome)> = stream::iter(tasks.into_iter().enumerate())
            .map(|(index, task)| async move { (index, self.fetch_one(&task).await) })
            .buffer_unordered(concurrency)
            .collect()
            .await;

        // Completion order is arbitrary; restore submission order
        indexed.sort_by_key(|(index, _)| *index);
        let outcomes: Vec<FetchOutcome> = indexed.into_iter().map(|(_, o)| o).collect();

        let failed = outcomes.iter().filter(|o| !o.is_success()).count();
        info!(
            total,
            succeeded = total - failed,
            failed,
            "batch fetch finished"
        );

        Ok(outcomes)
    }

    /// Fetch a single task, converting any error into a `Failure` outcome
    pub async fn fetch_one(&self, task: &FetchTask) -> FetchOutcome {
        let final_path = self.download_dir().join(&task.destination_name);
        let partial_path = partial_path_for(&final_path);

        self.event_tx
            .send(Event::Fetching {
                name: task.destination_name.clone(),
                url: task.url.clone(),
            })
            .ok();

        let result = if !is_plain_file_name(&task.destination_name) {
            Err(FetchError::InvalidDestination {
                name: task.destination_name.clone(),
            })
        } else {
            let download = self.download(&task.url, &partial_path, &final_path);
            match self.config.task_timeout {
                Some(after) => match tokio::time::timeout(after, download).await {
                    Ok(result) => result,
                    Err(_) => Err(FetchError::Timeout {
                        url: task.url.clone(),
                        after,
                    }),
                },
                None => download.await,
            }
        };

        match result {
            Ok(bytes) => {
                info!(
                    name = %task.destination_name,
                    ?final_path,
                    bytes,
                    "file downloaded"
                );
                self.event_tx
                    .send(Event::Fetched {
                        name: task.destination_name.clone(),
                        path: final_path.clone(),
                        bytes,
                    })
                    .ok();
                FetchOutcome::Success {
                    local_path: final_path,
                    bytes,
                }
            }
            Err(e) => {
                // An invalid name never touched disk and its path lies outside the directory
                if !matches!(e, FetchError::InvalidDestination { .. }) {
                    remove_partial_file(&partial_path).await;
                }
                let kind = e.kind();
                let detail = e.to_string();
                warn!(
                    name = %task.destination_name,
                    url = %task.url,
                    %kind,
                    error = %detail,
                    "download failed"
                );
                self.event_tx
                    .send(Event::FetchFailed {
                        name: task.destination_name.clone(),
                        kind,
                        error: detail.clone(),
                    })
                    .ok();
                FetchOutcome::Failure { kind, detail }
            }
        }
    }

    /// Stream `url` into `partial_path`, then move it to `final_path`
    async fn download(
        &self,
        url: &str,
        partial_path: &Path,
        final_path: &Path,
    ) -> std::result::Result<u64, FetchError> {
        debug!(url, ?final_path, "requesting resource");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.transport_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let write_error = |source: std::io::Error| FetchError::Write {
            path: partial_path.to_path_buf(),
            source,
        };

        let mut file = tokio::fs::File::create(partial_path).await.map_err(write_error)?;

        let mut body = response.bytes_stream();
        let mut bytes: u64 = 0;
        while let Some(chunk) = body.next().await {
            let chunk = chunk.map_err(|e| self.transport_error(url, e))?;
            file.write_all(&chunk).await.map_err(write_error)?;
            bytes += chunk.len() as u64;
        }
        file.flush().await.map_err(write_error)?;
        drop(file);

        tokio::fs::rename(partial_path, final_path)
            .await
            .map_err(|source| FetchError::Write {
                path: final_path.to_path_buf(),
                source,
            })?;

        Ok(bytes)
    }

    fn transport_error(&self, url: &str, e: reqwest::Error) -> FetchError {
        if e.is_timeout() {
            FetchError::Timeout {
                url: url.to_string(),
                after: self.config.connect_timeout,
            }
        } else {
            FetchError::Transport {
                url: url.to_string(),
                reason: e.to_string(),
            }
        }
    }
}

fn partial_path_for(final_path: &Path) -> PathBuf {
    let mut name = final_path.as_os_str().to_os_string();
    name.push(PARTIAL_SUFFIX);
    PathBuf::from(name)
}
