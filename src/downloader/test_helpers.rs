//! Shared test helpers for creating BatchDownloader instances in tests.

use crate::config::Config;
use crate::downloader::BatchDownloader;
use std::io::Write;
use std::path::Path;
use tempfile::tempdir;

/// Helper to create a test BatchDownloader writing into a fresh temp dir.
/// Returns the downloader and the tempdir (which must be kept alive).
pub(crate) fn create_test_downloader(
    tweak: impl FnOnce(&mut Config),
) -> (BatchDownloader, tempfile::TempDir) {
    let temp_dir = tempdir().unwrap();

    let mut config = Config::default();
    config.fetch.download_dir = temp_dir.path().join("downloads");
    tweak(&mut config);

    let downloader = BatchDownloader::new(config).unwrap();
    (downloader, temp_dir)
}

/// In-memory ZIP archive with the given members
pub(crate) fn zip_bytes(files: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
    let options =
        zip::write::FileOptions::default().compression_method(zip::CompressionMethod::Deflated);
    for (name, content) in files {
        writer.start_file(*name, options).unwrap();
        writer.write_all(content).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

/// HTML directory listing in the layout of an Apache autoindex table
pub(crate) fn listing_html(rows: &[(&str, &str, &str)]) -> String {
    let mut html = String::from(
        "<html><body><table>\n<tr><th>Name</th><th>Last modified</th><th>Size</th></tr>\n",
    );
    for (name, modified, size) in rows {
        html.push_str(&format!(
            "<tr><td><a href=\"{name}\">{name}</a></td><td align=\"right\">{modified}  </td><td align=\"right\">{size}</td></tr>\n"
        ));
    }
    html.push_str("</table></body></html>");
    html
}

/// Sorted file names directly inside `dir`
pub(crate) fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
