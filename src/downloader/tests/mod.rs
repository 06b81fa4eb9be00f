use super::test_helpers::*;
use super::*;
use crate::error::ErrorKind;
use crate::types::ProcessedResult;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};


async fn mount(server: &MockServer, path_str: &str, template: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(path_str))
        .respond_with(template)
        .mount(server)
        .await;
}

#[test]
fn new_rejects_invalid_config() {
    let mut config = Config::default();
    config.fetch.max_concurrent_fetches = Some(0);

    assert!(matches!(
        BatchDownloader::new(config),
        Err(Error::Config { .. })
    ));
}

#[test]
fn subscribers_receive_emitted_events() {
    let (downloader, _temp_dir) = create_test_downloader(|_| {});
    let mut events = downloader.subscribe();

    downloader.emit(Event::BatchComplete {
        succeeded: 1,
        failed: 0,
    });

    assert!(matches!(
        events.try_recv().unwrap(),
        Event::BatchComplete { succeeded: 1, .. }
    ));
}
