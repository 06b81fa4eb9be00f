//! Archive extraction
//!
//! Extracts ZIP archives member by member. Extraction runs on a blocking
//! thread; the first failing member aborts the run and leaves already written
//! members in place.

mod zip;

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;

pub use self::zip::ZipExtractor;

use crate::error::{PostProcessError, Result};
use std::path::{Path, PathBuf};
use tokio::task::spawn_blocking;
use tracing::info;

/// Extract `archive_path` into `dest_path`, returning the written files
///
/// The file is opened as ZIP whatever its extension; the codec rejects
/// anything that is not an archive with [`PostProcessError::CorruptArchive`].
pub async fn extract_archive(archive_path: &Path, dest_path: &Path) -> Result<Vec<PathBuf>> {
    info!(?archive_path, ?dest_path, "extracting archive");

    let archive_owned = archive_path.to_path_buf();
    let dest_owned = dest_path.to_path_buf();

    spawn_blocking(move || ZipExtractor::try_extract(&archive_owned, &dest_owned))
        .await
        .map_err(|e| PostProcessError::ExtractionFailed {
            archive: archive_path.to_path_buf(),
            reason: format!("extraction task panicked: {}", e),
        })?
}
