use super::*;
use crate::error::ErrorKind;
use tempfile::TempDir;

fn processor() -> (PostProcessor, broadcast::Receiver<Event>) {
    let (event_tx, event_rx) = broadcast::channel(100);
    (PostProcessor::new(event_tx), event_rx)
}

fn success(path: &Path) -> FetchOutcome {
    FetchOutcome::Success {
        local_path: path.to_path_buf(),
        bytes: std::fs::metadata(path).map(|m| m.len()).unwrap_or(0),
    }
}

fn create_zip_archive(archive_path: &Path, files: &[(&str, &[u8])]) {
    let file = std::fs::File::create(archive_path).unwrap();
    let mut writer = zip::ZipWriter::new(file);
    let options =
        zip::write::FileOptions::default().compression_method(zip::CompressionMethod::Stored);
    for (name, content) in files {
        writer.start_file(*name, options).unwrap();
        std::io::Write::write_all(&mut writer, content).unwrap();
    }
    writer.finish().unwrap();
}

#[tokio::test]
async fn archive_is_deleted_after_successful_extraction() {
    let temp_dir = TempDir::new().unwrap();
    let archive = temp_dir.path().join("Divvy_Trips_2019_Q2.zip");
    create_zip_archive(&archive, &[("Divvy_Trips_2019_Q2.csv", b"id\n1\n")]);
    let (processor, mut events) = processor();

    let result = processor
        .process(
            "Divvy_Trips_2019_Q2",
            &success(&archive),
            &ResourceKind::Archive {
                dest_dir: temp_dir.path().to_path_buf(),
            },
        )
        .await;

    let expected: BTreeSet<PathBuf> =
        [temp_dir.path().join("Divvy_Trips_2019_Q2.csv")].into();
    assert_eq!(
        result,
        ProcessedResult::Extracted {
            artifact_paths: expected
        }
    );
    assert!(!archive.exists(), "archive should be removed after extraction");

    assert!(matches!(
        events.recv().await.unwrap(),
        Event::Extracted { files: 1, .. }
    ));
    assert!(matches!(
        events.recv().await.unwrap(),
        Event::ArchiveRemoved { .. }
    ));
}

#[tokio::test]
async fn corrupt_archive_is_kept_and_skipped() {
    let temp_dir = TempDir::new().unwrap();
    let archive = temp_dir.path().join("broken.zip");
    std::fs::write(&archive, b"this is not a zip file").unwrap();
    let (processor, _events) = processor();

    let result = processor
        .process(
            "broken",
            &success(&archive),
            &ResourceKind::Archive {
                dest_dir: temp_dir.path().to_path_buf(),
            },
        )
        .await;

    assert!(matches!(
        result,
        ProcessedResult::Skipped {
            reason: ErrorKind::CorruptArchive,
            ..
        }
    ));
    assert!(archive.exists(), "failed extraction must leave the archive");
}

#[tokio::test]
async fn vanished_file_is_not_found() {
    let temp_dir = TempDir::new().unwrap();
    let (processor, _events) = processor();
    let outcome = FetchOutcome::Success {
        local_path: temp_dir.path().join("gone.zip"),
        bytes: 10,
    };

    let result = processor
        .process(
            "gone",
            &outcome,
            &ResourceKind::Archive {
                dest_dir: temp_dir.path().to_path_buf(),
            },
        )
        .await;

    assert!(matches!(
        result,
        ProcessedResult::Skipped {
            reason: ErrorKind::NotFound,
            ..
        }
    ));
}

#[tokio::test]
async fn tabular_resource_is_aggregated() {
    let temp_dir = TempDir::new().unwrap();
    let csv = temp_dir.path().join("01001099999.csv");
    std::fs::write(&csv, "HourlyDryBulbTemperature\n10\n25\n7\n").unwrap();
    let (processor, mut events) = processor();

    let result = processor
        .process(
            "01001099999",
            &success(&csv),
            &ResourceKind::Tabular {
                field: "HourlyDryBulbTemperature".into(),
            },
        )
        .await;

    assert_eq!(
        result,
        ProcessedResult::Aggregated {
            field: "HourlyDryBulbTemperature".into(),
            value: 25.0
        }
    );
    assert!(csv.exists(), "tabular files are kept");
    assert!(matches!(
        events.recv().await.unwrap(),
        Event::Aggregated { value, .. } if value == 25.0
    ));
}

#[tokio::test]
async fn tabular_missing_field_is_skipped() {
    let temp_dir = TempDir::new().unwrap();
    let csv = temp_dir.path().join("a.csv");
    std::fs::write(&csv, "A\n1\n").unwrap();
    let (processor, mut events) = processor();

    let result = processor
        .process(
            "a",
            &success(&csv),
            &ResourceKind::Tabular {
                field: "HourlyDryBulbTemperature".into(),
            },
        )
        .await;

    assert!(matches!(
        result,
        ProcessedResult::Skipped {
            reason: ErrorKind::MissingField,
            ..
        }
    ));
    assert!(matches!(
        events.recv().await.unwrap(),
        Event::Skipped {
            reason: ErrorKind::MissingField,
            ..
        }
    ));
}

#[tokio::test]
async fn failed_fetch_is_skipped_without_touching_disk() {
    let (processor, mut events) = processor();
    let outcome = FetchOutcome::Failure {
        kind: ErrorKind::NetworkFailure,
        detail: "HTTP 404".into(),
    };

    let result = processor
        .process(
            "Divvy_Trips_2220_Q1",
            &outcome,
            &ResourceKind::Tabular { field: "T".into() },
        )
        .await;

    assert_eq!(
        result,
        ProcessedResult::Skipped {
            reason: ErrorKind::NetworkFailure,
            detail: "HTTP 404".into()
        }
    );
    assert!(events.try_recv().is_err(), "no post-processing events expected");
}
