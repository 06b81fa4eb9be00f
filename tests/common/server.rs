//! Mock HTTP server and downloader construction

use batch_dl::{BatchDownloader, Config};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Serve `body` with status 200 at `route`
pub async fn serve(server: &MockServer, route: &str, body: impl Into<Vec<u8>>) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body.into()))
        .mount(server)
        .await;
}

/// Serve `status` with an empty body at `route`
pub async fn serve_status(server: &MockServer, route: &str, status: u16) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

/// Downloader writing into a fresh temp dir; keep the `TempDir` alive
pub fn downloader_with(tweak: impl FnOnce(&mut Config)) -> (BatchDownloader, TempDir) {
    let temp_dir = tempfile::tempdir().unwrap();
    let mut config = Config::default();
    config.fetch.download_dir = temp_dir.path().join("downloads");
    tweak(&mut config);
    (BatchDownloader::new(config).unwrap(), temp_dir)
}
