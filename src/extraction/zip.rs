use crate::error::{PostProcessError, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Archive extractor for ZIP files
pub struct ZipExtractor;

impl ZipExtractor {
    /// Classify a codec error raised while reading `archive_path`
    fn map_zip_error(error: zip::result::ZipError, archive_path: &Path) -> PostProcessError {
        match error {
            zip::result::ZipError::Io(e) => PostProcessError::from_io(archive_path, &e),
            other => PostProcessError::CorruptArchive {
                archive: archive_path.to_path_buf(),
                reason: other.to_string(),
            },
        }
    }

    /// Extract a single ZIP entry to disk, creating directories as needed
    fn extract_zip_entry(
        mut file: zip::read::ZipFile,
        dest_path: &Path,
        archive_path: &Path,
    ) -> Result<Option<PathBuf>> {
        let file_path = match file.enclosed_name() {
            Some(path) => dest_path.join(path),
            None => {
                warn!(?archive_path, entry = file.name(), "skipping entry with unsafe path");
                return Ok(None);
            }
        };

        if file.is_dir() {
            std::fs::create_dir_all(&file_path)
                .map_err(|e| PostProcessError::from_io(&file_path, &e))?;
            return Ok(None);
        }

        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| PostProcessError::from_io(parent, &e))?;
        }

        let mut outfile = std::fs::File::create(&file_path)
            .map_err(|e| PostProcessError::from_io(&file_path, &e))?;

        std::io::copy(&mut file, &mut outfile).map_err(|e| {
            // Decompression and CRC failures surface as InvalidData
            if e.kind() == std::io::ErrorKind::InvalidData {
                PostProcessError::CorruptArchive {
                    archive: archive_path.to_path_buf(),
                    reason: format!("failed to decode {}: {}", file_path.display(), e),
                }
            } else {
                PostProcessError::from_io(&file_path, &e)
            }
        })?;

        Ok(Some(file_path))
    }

    /// Extract every member of `archive_path` into `dest_path`
    ///
    /// Blocking; run it on a blocking thread from async code.
    pub fn try_extract(archive_path: &Path, dest_path: &Path) -> Result<Vec<PathBuf>> {
        debug!(?archive_path, ?dest_path, "attempting ZIP extraction");

        std::fs::create_dir_all(dest_path).map_err(|e| PostProcessError::from_io(dest_path, &e))?;

        let file = std::fs::File::open(archive_path)
            .map_err(|e| PostProcessError::from_io(archive_path, &e))?;

        let mut archive = zip::ZipArchive::new(file)
            .map_err(|e| Self::map_zip_error(e, archive_path))?;

        let mut extracted_files = Vec::new();

        for i in 0..archive.len() {
            let file = archive
                .by_index(i)
                .map_err(|e| Self::map_zip_error(e, archive_path))?;

            if let Some(file_path) = Self::extract_zip_entry(file, dest_path, archive_path)? {
                extracted_files.push(file_path);
            }
        }

        info!(
            ?archive_path,
            extracted_count = extracted_files.len(),
            "ZIP extraction successful"
        );

        Ok(extracted_files)
    }
}
