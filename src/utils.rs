//! Utility functions for file operations and URL handling

use std::path::{Component, Path};

/// Derive a destination file name from the last path segment of a URL
///
/// Unlike a display name, the extension is kept: the file on disk must keep
/// the suffix its post-processor keys off.
///
/// # Examples
///
/// ```
/// use batch_dl::utils::filename_from_url;
///
/// assert_eq!(
///     filename_from_url("https://divvy-tripdata.s3.amazonaws.com/Divvy_Trips_2019_Q1.zip"),
///     "Divvy_Trips_2019_Q1.zip"
/// );
/// assert_eq!(filename_from_url("https://example.com/"), "download");
/// ```
pub fn filename_from_url(url: &str) -> String {
    if let Ok(parsed_url) = url::Url::parse(url)
        && let Some(mut segments) = parsed_url.path_segments()
        && let Some(last_segment) = segments.next_back()
        && !last_segment.is_empty()
    {
        return last_segment.to_string();
    }

    // Not an absolute URL; take whatever follows the final slash
    match url.rsplit('/').next() {
        Some(tail) if !tail.is_empty() && tail != url => tail.to_string(),
        _ => "download".to_string(),
    }
}

/// Number a file name the way a second copy would be named: `data.zip` becomes `data (1).zip`
pub fn numbered_name(name: &str, n: usize) -> String {
    let path = Path::new(name);
    match (
        path.file_stem().and_then(|s| s.to_str()),
        path.extension().and_then(|e| e.to_str()),
    ) {
        (Some(stem), Some(ext)) => format!("{} ({}).{}", stem, n, ext),
        _ => format!("{} ({})", name, n),
    }
}

/// Whether `name` is a single plain file name that stays inside any directory it is joined to
///
/// Rejects empty names, `.` and `..`, absolute paths, and anything carrying a
/// `/` or `\` separator.
pub fn is_plain_file_name(name: &str) -> bool {
    if name.contains(['/', '\\']) {
        return false;
    }
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

/// Create `path` and any missing parents
///
/// Idempotent and safe under concurrent first access: an already existing
/// directory is success, so there is no check-then-create window.
pub async fn ensure_dir_exists(path: &Path) -> std::io::Result<()> {
    tokio::fs::create_dir_all(path).await
}

/// Remove a partially written file, logging instead of failing
pub(crate) async fn remove_partial_file(path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => tracing::debug!(?path, "removed partial file"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!(?path, error = %e, "failed to remove partial file"),
    }
}
