//! Cleanup stage for removing a source archive once it has been extracted

use crate::error::{PostProcessError, Result};
use std::path::Path;
use tracing::{debug, warn};

/// Delete `archive_path`
///
/// Callers invoke this only after extraction reported success; a failed
/// extraction keeps its archive on disk.
pub(crate) async fn remove_archive(archive_path: &Path) -> Result<()> {
    match tokio::fs::remove_file(archive_path).await {
        Ok(()) => {
            debug!(?archive_path, "deleted source archive");
            Ok(())
        }
        Err(e) => {
            warn!(?archive_path, error = %e, "failed to delete source archive");
            let err = match e.kind() {
                std::io::ErrorKind::NotFound | std::io::ErrorKind::PermissionDenied => {
                    PostProcessError::from_io(archive_path, &e)
                }
                _ => PostProcessError::CleanupFailed {
                    path: archive_path.to_path_buf(),
                    reason: e.to_string(),
                },
            };
            Err(err.into())
        }
    }
}
