//! Divvy trip archives example
//!
//! Downloads the quarterly Divvy trip archives concurrently, extracts each
//! one into `downloads/` and deletes the archive afterwards. The 2220
//! archive does not exist upstream; it shows up as a skipped entry without
//! affecting the others, and its repeated URL is fetched only once.
//!
//! ```bash
//! RUST_LOG=batch_dl=info cargo run --example divvy_archives
//! ```

use batch_dl::{BatchDownloader, Config, Event};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const URLS: [&str; 8] = [
    "https://divvy-tripdata.s3.amazonaws.com/Divvy_Trips_2018_Q4.zip",
    "https://divvy-tripdata.s3.amazonaws.com/Divvy_Trips_2019_Q1.zip",
    "https://divvy-tripdata.s3.amazonaws.com/Divvy_Trips_2220_Q1.zip",
    "https://divvy-tripdata.s3.amazonaws.com/Divvy_Trips_2019_Q2.zip",
    "https://divvy-tripdata.s3.amazonaws.com/Divvy_Trips_2019_Q3.zip",
    "https://divvy-tripdata.s3.amazonaws.com/Divvy_Trips_2019_Q4.zip",
    "https://divvy-tripdata.s3.amazonaws.com/Divvy_Trips_2020_Q1.zip",
    "https://divvy-tripdata.s3.amazonaws.com/Divvy_Trips_2220_Q1.zip",
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "batch_dl=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let downloader = BatchDownloader::new(Config::default())?;

    let mut events = downloader.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            match event {
                Event::Fetched { name, bytes, .. } => println!("fetched {name} ({bytes} bytes)"),
                Event::FetchFailed { name, error, .. } => println!("failed {name}: {error}"),
                Event::ArchiveRemoved { path } => println!("removed {}", path.display()),
                _ => {}
            }
        }
    });

    let report = downloader.fetch_archives(URLS).await?;

    println!();
    for line in report.status_lines() {
        println!("{line}");
    }
    println!("{} succeeded, {} failed", report.succeeded(), report.failed());

    Ok(())
}
